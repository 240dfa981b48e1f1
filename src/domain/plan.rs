// ==========================================
// 产量计划仿真与分析系统 - 计划配置与仿真结果
// ==========================================
// 职责: PlanConfig (仿真请求) + PlanResult (仿真输出) 数据契约
// 红线: 字段名是渲染/导出/对比组件的读取契约, 改名即破坏性变更
// ==========================================

use crate::domain::types::PlanMode;
use crate::domain::week::WeekId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// PlanConfig - 计划配置
// ==========================================
// 每次仿真请求构造一次, 构造后不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 区间内的日历天数 (start > end 时为 0)
    pub fn days(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        ((self.end - self.start).num_days() + 1) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    pub date_range: DateRange,
    pub mode: PlanMode,
    pub sites: BTreeSet<String>,
    /// 统一爬坡曲线 (Some 时覆盖各站点自身的预设)
    #[serde(default)]
    pub ramp_curve: Option<String>,
    /// 周日加班
    #[serde(default)]
    pub ot_enabled: bool,
    pub shift_hours: f64,
    pub working_days_per_week: u8,
}

impl PlanConfig {
    /// 创建默认配置: 单班 10 小时, 每周 7 天, 不加班
    pub fn new(start: NaiveDate, end: NaiveDate, mode: PlanMode, sites: &[&str]) -> Self {
        Self {
            date_range: DateRange::new(start, end),
            mode,
            sites: sites.iter().map(|s| s.to_string()).collect(),
            ramp_curve: None,
            ot_enabled: false,
            shift_hours: 10.0,
            working_days_per_week: 7,
        }
    }
}

// ==========================================
// DayRecord - 站点日记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub ramp_utilization: f64,     // 当日爬坡利用率
    pub input_unconstrained: f64,  // 爬坡曲线投入 (不封顶)
    pub ctb_daily: Option<f64>,    // 当日 CTB 上限 (None = 无约束)
    pub input_final: f64,          // 最终投入
    pub output_final: f64,         // 产出 (投入滞后 input→output 提前量)
    pub shipment_final: f64,       // 出货 (产出滞后 output→shipment 提前量)
    pub cum_input: f64,
    pub cum_output: f64,
    pub cum_shipment: f64,
}

// ==========================================
// ProgramResult - 跨站点日汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramResult {
    pub date: NaiveDate,
    pub ramp_utilization: f64,     // 各站点中最慢的爬坡利用率
    pub input_unconstrained: f64,
    pub ctb_daily: Option<f64>,    // 所有站点当日均有上限时为上限之和
    pub input_final: f64,
    pub output_final: f64,
    pub shipment_final: f64,
    pub cum_input: f64,
    pub cum_output: f64,
    pub cum_shipment: f64,
}

// ==========================================
// WeekMetric - 周指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMetric {
    pub week_id: WeekId,
    pub input: f64,
    pub output: f64,
    pub shipments: f64,
    pub demand: f64,
    pub gap: f64,        // shipments - demand
    pub attainment: f64, // 达成率 (%)
}

impl WeekMetric {
    /// 由周汇总量构造, 需求为 0 时达成率固定 100
    pub fn new(week_id: WeekId, input: f64, output: f64, shipments: f64, demand: f64) -> Self {
        let attainment = if demand > 0.0 {
            shipments / demand * 100.0
        } else {
            100.0
        };
        Self {
            week_id,
            input,
            output,
            shipments,
            demand,
            gap: shipments - demand,
            attainment,
        }
    }
}

// ==========================================
// PlanSummary / PlanResult
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total_output: f64,
    pub total_shipment: f64,
    pub overall_attainment: f64,
    pub weeks_with_gap: BTreeSet<WeekId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub mode: PlanMode,
    pub program_results: Vec<ProgramResult>,
    pub site_results: BTreeMap<String, Vec<DayRecord>>,
    pub weekly_metrics: Vec<WeekMetric>,
    pub summary: PlanSummary,
}

/// 组合模式结果: 同一输入的封顶/不封顶两次运行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPlanResult {
    pub mode: PlanMode,
    pub constrained: PlanResult,
    pub unconstrained: PlanResult,
}

// ==========================================
// PlanOutcome - 仿真引擎输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanOutcome {
    Combined(CombinedPlanResult),
    Single(PlanResult),
}

impl PlanOutcome {
    pub fn mode(&self) -> PlanMode {
        match self {
            PlanOutcome::Combined(c) => c.mode,
            PlanOutcome::Single(r) => r.mode,
        }
    }

    /// 驱动分析的主结果 (组合模式下为封顶结果)
    pub fn primary(&self) -> &PlanResult {
        match self {
            PlanOutcome::Combined(c) => &c.constrained,
            PlanOutcome::Single(r) => r,
        }
    }

    /// 对照用的不封顶结果 (仅组合模式)
    pub fn unconstrained(&self) -> Option<&PlanResult> {
        match self {
            PlanOutcome::Combined(c) => Some(&c.unconstrained),
            PlanOutcome::Single(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_metric_attainment() {
        let week = WeekId(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());

        let m = WeekMetric::new(week, 0.0, 0.0, 80.0, 100.0);
        assert_eq!(m.gap, -20.0);
        assert!((m.attainment - 80.0).abs() < 1e-9);

        let zero = WeekMetric::new(week, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.attainment, 100.0);
        assert_eq!(zero.gap, 0.0);
    }

    #[test]
    fn test_date_range_days() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        assert_eq!(DateRange::new(d(1), d(31)).days(), 31);
        assert_eq!(DateRange::new(d(5), d(5)).days(), 1);
        assert_eq!(DateRange::new(d(6), d(5)).days(), 0);
    }

    #[test]
    fn test_plan_config_wire_names() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let config = PlanConfig::new(d, d, PlanMode::Combined, &["S1"]);
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("dateRange").is_some());
        assert!(value.get("otEnabled").is_some());
        assert!(value.get("workingDaysPerWeek").is_some());
        assert_eq!(value["rampCurve"], serde_json::Value::Null);
    }
}
