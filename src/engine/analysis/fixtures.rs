// 分析引擎单元测试共用的结果构造器

use crate::domain::plan::{PlanResult, PlanSummary, ProgramResult, WeekMetric};
use crate::domain::types::PlanMode;
use crate::domain::week::WeekId;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

pub fn day0() -> NaiveDate {
    // 周日
    NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
}

/// 由每日产出序列构造 PlanResult (投入=产出=出货, 爬坡满载)
pub fn plan_from_outputs(mode: PlanMode, outputs: &[f64]) -> PlanResult {
    let mut cum = 0.0;
    let program_results: Vec<ProgramResult> = outputs
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            cum += value;
            ProgramResult {
                date: day0() + Duration::days(idx as i64),
                ramp_utilization: 1.0,
                input_unconstrained: value,
                ctb_daily: None,
                input_final: value,
                output_final: value,
                shipment_final: value,
                cum_input: cum,
                cum_output: cum,
                cum_shipment: cum,
            }
        })
        .collect();

    PlanResult {
        mode,
        summary: PlanSummary {
            total_output: outputs.iter().sum(),
            total_shipment: outputs.iter().sum(),
            overall_attainment: 100.0,
            weeks_with_gap: BTreeSet::new(),
        },
        program_results,
        site_results: BTreeMap::new(),
        weekly_metrics: Vec::new(),
    }
}

pub fn week(offset_weeks: i64, shipments: f64, demand: f64) -> WeekMetric {
    WeekMetric::new(
        WeekId(day0() + Duration::weeks(offset_weeks)),
        shipments,
        shipments,
        shipments,
        demand,
    )
}
