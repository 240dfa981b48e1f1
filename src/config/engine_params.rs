// ==========================================
// 产量计划仿真与分析系统 - 引擎参数
// ==========================================
// 职责: 仿真参数 + 分析阈值 (带默认值, 可由 config_kv 覆写)
// 存储: config_kv 表, 键见 config_keys
// ==========================================

use crate::engine::week_scheme::WeekScheme;
use serde::{Deserialize, Serialize};

// ==========================================
// SimulationParams - 仿真参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// 开启加班时的投入倍数
    pub overtime_multiplier: f64,

    /// 周分桶口径
    #[serde(default)]
    pub week_scheme: WeekScheme,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            overtime_multiplier: 1.15,
            week_scheme: WeekScheme::sunday_start(),
        }
    }
}

// ==========================================
// AnalysisThresholds - 分析阈值
// ==========================================
// 百分比字段均为 0~100 口径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisThresholds {
    // ===== 缺口分析 =====
    pub gap_critical_attainment: f64, // 达成率低于此值 → critical
    pub gap_warning_attainment: f64,  // 达成率低于此值 → warning

    // ===== CTB 约束分析 =====
    pub ctb_critical_percent: f64,  // 影响比例高于此值 → critical
    pub ctb_warning_percent: f64,   // 影响比例高于此值 → warning
    pub ctb_recommend_percent: f64, // 影响比例高于此值 → 生成建议

    // ===== 稳定性分析 =====
    pub spike_percent: f64,         // |环比| 高于此值视为突变
    pub spike_warning_percent: f64, // |环比| 高于此值 → warning

    // ===== 爬坡分析 =====
    pub ramp_window_days: usize,
    pub ramp_slow_ratio: f64,
    pub ramp_aggressive_ratio: f64,
    pub ramp_slow_min_days: usize, // 区间天数超过此值才提示爬坡过慢
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            gap_critical_attainment: 80.0,
            gap_warning_attainment: 90.0,
            ctb_critical_percent: 20.0,
            ctb_warning_percent: 10.0,
            ctb_recommend_percent: 10.0,
            spike_percent: 30.0,
            spike_warning_percent: 50.0,
            ramp_window_days: 7,
            ramp_slow_ratio: 1.2,
            ramp_aggressive_ratio: 3.0,
            ramp_slow_min_days: 14,
        }
    }
}
