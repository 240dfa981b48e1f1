// ==========================================
// 产量计划仿真与分析系统 - 引擎层
// ==========================================
// 职责: 爬坡曲线 / 计划仿真 / 计划分析 三个纯计算引擎
// 红线: 引擎不访问数据库与文件, 不持有进程级可变状态
// ==========================================

pub mod analysis;
pub mod error;
pub mod ramp_curve;
pub mod seed_validation;
pub mod simulation;
pub mod week_scheme;

// 重导出核心引擎
pub use analysis::{PlanAnalysisEngine, RecommendationRule};
pub use error::{EngineError, EngineResult};
pub use ramp_curve::{RampCurvePreset, RampCurveTable, RampPoint};
pub use seed_validation::validate_seed_data;
pub use simulation::SimulationEngine;
pub use week_scheme::WeekScheme;
