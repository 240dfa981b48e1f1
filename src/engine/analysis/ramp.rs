// ==========================================
// 产量计划仿真与分析系统 - 爬坡健康分析
// ==========================================
// 职责: 末窗口产出 / 首窗口产出 → 爬坡比, 判定爬坡健康度
// 规则:
// - 天数 < 窗口 或 首窗口产出为 0 → unknown
// - 爬坡比 > 3 → warning (过激), suboptimal
// - 爬坡比 < 1.2: 首窗口已满载且爬坡比 >= 1 (平台期) → healthy;
//   否则 suboptimal, 区间 > 14 天时追加 info (过慢)
// - 1.2 ~ 3 → healthy
// ==========================================

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{Issue, RampAnalysis};
use crate::domain::plan::ProgramResult;
use crate::domain::types::{IssueType, RampHealth, Severity};
use serde_json::json;

const FULL_UTILIZATION_EPS: f64 = 1e-9;

/// 爬坡分析
pub fn analyze_ramp(
    program_results: &[ProgramResult],
    thresholds: &AnalysisThresholds,
) -> RampAnalysis {
    let window = thresholds.ramp_window_days.max(1);
    let days = program_results.len();

    if days < window {
        return unknown(0.0, 0.0);
    }

    let first_window = &program_results[..window];
    let last_window = &program_results[days - window..];
    let first_output: f64 = first_window.iter().map(|d| d.output_final).sum();
    let last_output: f64 = last_window.iter().map(|d| d.output_final).sum();

    if first_output <= 0.0 {
        return unknown(first_output, last_output);
    }

    let ratio = last_output / first_output;
    let details = json!({
        "rampRatio": ratio,
        "firstWindowOutput": first_output,
        "lastWindowOutput": last_output,
        "windowDays": window,
        "days": days,
    });

    let mut issues = Vec::new();
    let ramp_health = if ratio > thresholds.ramp_aggressive_ratio {
        issues.push(Issue {
            issue_type: IssueType::Ramp,
            severity: Severity::Warning,
            week_id: None,
            date: None,
            message: format!(
                "爬坡过激: 末 {} 天产出为首 {} 天的 {:.2} 倍",
                window, window, ratio
            ),
            details,
        });
        RampHealth::Suboptimal
    } else if ratio < thresholds.ramp_slow_ratio {
        // 平台期: 首窗口已满载, 且末窗口不低于首窗口
        let plateau = ratio >= 1.0 - FULL_UTILIZATION_EPS
            && first_window
                .iter()
                .all(|d| d.ramp_utilization >= 1.0 - FULL_UTILIZATION_EPS);
        if plateau {
            RampHealth::Healthy
        } else {
            if days > thresholds.ramp_slow_min_days {
                issues.push(Issue {
                    issue_type: IssueType::Ramp,
                    severity: Severity::Info,
                    week_id: None,
                    date: None,
                    message: format!(
                        "爬坡过慢: 末 {} 天产出仅为首 {} 天的 {:.2} 倍",
                        window, window, ratio
                    ),
                    details,
                });
            }
            RampHealth::Suboptimal
        }
    } else {
        RampHealth::Healthy
    };

    RampAnalysis {
        issues,
        ramp_health,
        ramp_ratio: Some(ratio),
        first_window_output: first_output,
        last_window_output: last_output,
    }
}

fn unknown(first_window_output: f64, last_window_output: f64) -> RampAnalysis {
    RampAnalysis {
        issues: Vec::new(),
        ramp_health: RampHealth::Unknown,
        ramp_ratio: None,
        first_window_output,
        last_window_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PlanMode;
    use crate::engine::analysis::fixtures::plan_from_outputs;

    fn outputs(first: f64, middle: usize, last: f64) -> Vec<f64> {
        let mut v = vec![first; 7];
        v.extend(std::iter::repeat((first + last) / 2.0).take(middle));
        v.extend(std::iter::repeat(last).take(7));
        v
    }

    #[test]
    fn test_aggressive_ramp() {
        let plan = plan_from_outputs(PlanMode::Constrained, &outputs(100.0, 7, 400.0));
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Suboptimal);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Warning);
        assert!((result.ramp_ratio.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_healthy_ramp() {
        let plan = plan_from_outputs(PlanMode::Constrained, &outputs(100.0, 7, 200.0));
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Healthy);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_flat_plateau_is_healthy() {
        let plan = plan_from_outputs(PlanMode::Constrained, &[100.0; 31]);
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Healthy);
        assert!(result.issues.is_empty());
        assert_eq!(result.ramp_ratio, Some(1.0));
    }

    #[test]
    fn test_output_drop_after_full_ramp_is_not_plateau() {
        let plan = plan_from_outputs(PlanMode::Constrained, &outputs(100.0, 7, 30.0));
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Suboptimal);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Info);
        assert!((result.ramp_ratio.unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_slow_ramp_below_full_utilization() {
        let mut plan = plan_from_outputs(PlanMode::Constrained, &[100.0; 21]);
        for day in plan.program_results.iter_mut() {
            day.ramp_utilization = 0.5;
        }
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Suboptimal);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Info);

        // 区间未超过 14 天: 不提示
        plan.program_results.truncate(14);
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Suboptimal);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_insufficient_data_is_unknown() {
        let plan = plan_from_outputs(PlanMode::Constrained, &[100.0; 6]);
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Unknown);
        assert!(result.issues.is_empty());

        let plan = plan_from_outputs(PlanMode::Constrained, &outputs(0.0, 0, 100.0));
        let result = analyze_ramp(&plan.program_results, &AnalysisThresholds::default());
        assert_eq!(result.ramp_health, RampHealth::Unknown);
        assert_eq!(result.ramp_ratio, None);
    }
}
