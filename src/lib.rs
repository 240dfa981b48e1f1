// ==========================================
// 产量计划仿真与分析系统 - 核心库
// ==========================================
// 系统定位: 计划仿真 + 计划风险分析 (决策支持, 人工最终控制权)
// 流程: 基础数据 + 计划配置 → 仿真引擎 → PlanResult → 分析引擎 → AnalysisResult
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 数据契约与类型
pub mod domain;

// 引擎层 - 爬坡 / 仿真 / 分析
pub mod engine;

// 导入层 - 基础数据
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 可选文字解读接入点
pub mod insight;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IssueType, OverallHealth, PlanMode, Priority, RampHealth, Severity};

// 领域实体
pub use domain::{
    AnalysisResult, DayRecord, PlanConfig, PlanOutcome, PlanResult, ProgramResult, SeedData,
    SiteSeed, WeekId, WeekMetric,
};

// 引擎
pub use engine::{EngineError, PlanAnalysisEngine, RampCurveTable, SimulationEngine};

// API
pub use api::{ApiError, PlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称 (同时用作数据目录名)
pub const APP_NAME: &str = "production-plan-aps";
