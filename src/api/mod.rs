// ==========================================
// 产量计划仿真与分析系统 - API 层
// ==========================================
// 职责: 面向调用方 (CLI / 渲染 / 导出组件) 的统一入口
// ==========================================

pub mod error;
pub mod plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_api::{PlanApi, PlanComparison, PlanRun};
