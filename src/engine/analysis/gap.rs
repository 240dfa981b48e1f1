// ==========================================
// 产量计划仿真与分析系统 - 缺口分析
// ==========================================
// 职责: 周出货 vs 周需求, 对负缺口周按达成率分级
// 规则: attainment < 80 → critical, < 90 → warning, 其余 → info
// ==========================================

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{GapAnalysis, Issue};
use crate::domain::plan::WeekMetric;
use crate::domain::types::{IssueType, Severity};
use serde_json::json;

/// 缺口分析
///
/// # 参数
/// - `weekly_metrics`: 周指标 (含部分覆盖的边界周)
/// - `thresholds`: 分析阈值
pub fn analyze_gap(weekly_metrics: &[WeekMetric], thresholds: &AnalysisThresholds) -> GapAnalysis {
    let mut issues = Vec::new();
    let mut total_gap = 0.0;
    let mut attainment_sum = 0.0;

    for week in weekly_metrics.iter().filter(|w| w.gap < 0.0) {
        let severity = classify(week.attainment, thresholds);
        total_gap += week.gap;
        attainment_sum += week.attainment;

        issues.push(Issue {
            issue_type: IssueType::Gap,
            severity,
            week_id: Some(week.week_id),
            date: None,
            message: format!(
                "周 {} 出货 {:.0} 低于需求 {:.0}, 缺口 {:.0} (达成率 {:.1}%)",
                week.week_id, week.shipments, week.demand, -week.gap, week.attainment
            ),
            details: json!({
                "shipments": week.shipments,
                "demand": week.demand,
                "gap": week.gap,
                "attainment": week.attainment,
            }),
        });
    }

    let weeks_with_gap = issues.len();
    let avg_attainment = if weeks_with_gap > 0 {
        attainment_sum / weeks_with_gap as f64
    } else {
        100.0
    };

    GapAnalysis {
        issues,
        total_gap,
        avg_attainment,
        weeks_with_gap,
        total_weeks: weekly_metrics.len(),
    }
}

fn classify(attainment: f64, thresholds: &AnalysisThresholds) -> Severity {
    if attainment < thresholds.gap_critical_attainment {
        Severity::Critical
    } else if attainment < thresholds.gap_warning_attainment {
        Severity::Warning
    } else {
        Severity::Info
    }
}
