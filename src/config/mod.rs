// ==========================================
// 产量计划仿真与分析系统 - 配置层
// ==========================================
// 职责: 引擎参数 (仿真参数 / 分析阈值 / 爬坡预设) 的加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_params;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
pub use engine_params::{AnalysisThresholds, SimulationParams};
