// ==========================================
// 产量计划仿真与分析系统 - 产出稳定性分析
// ==========================================
// 职责: 相邻两日产出环比, 识别突变点并计算波动率
// 规则: |环比| > 30 为突变, > 50 → warning, 其余 → info
// ==========================================

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{Issue, OutputSpike, StabilityAnalysis};
use crate::domain::plan::ProgramResult;
use crate::domain::types::{IssueType, Severity};
use serde_json::json;

/// 稳定性分析
pub fn analyze_stability(
    program_results: &[ProgramResult],
    thresholds: &AnalysisThresholds,
) -> StabilityAnalysis {
    let mut issues = Vec::new();
    let mut spikes = Vec::new();
    let mut abs_change_sum = 0.0;

    for pair in program_results.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let change_percent = change_percent(prev.output_final, curr.output_final);
        abs_change_sum += change_percent.abs();

        if change_percent.abs() <= thresholds.spike_percent {
            continue;
        }

        let severity = if change_percent.abs() > thresholds.spike_warning_percent {
            Severity::Warning
        } else {
            Severity::Info
        };
        let direction = if change_percent > 0.0 { "上升" } else { "下降" };

        issues.push(Issue {
            issue_type: IssueType::Stability,
            severity,
            week_id: None,
            date: Some(curr.date),
            message: format!(
                "{} 产出{} {:.1}% ({:.0} → {:.0})",
                curr.date,
                direction,
                change_percent.abs(),
                prev.output_final,
                curr.output_final
            ),
            details: json!({
                "previousOutput": prev.output_final,
                "currentOutput": curr.output_final,
                "changePercent": change_percent,
            }),
        });
        spikes.push(OutputSpike {
            date: curr.date,
            previous_output: prev.output_final,
            current_output: curr.output_final,
            change_percent,
        });
    }

    let pairs = program_results.len().saturating_sub(1);
    let volatility = if pairs > 0 {
        abs_change_sum / pairs as f64
    } else {
        0.0
    };

    StabilityAnalysis {
        issues,
        volatility,
        spikes,
    }
}

/// 环比 (%), 前一日为 0 时记 0
fn change_percent(prev: f64, curr: f64) -> f64 {
    if prev == 0.0 {
        0.0
    } else {
        (curr - prev) / prev * 100.0
    }
}
