// ==========================================
// 产量计划仿真与分析系统 - CTB 约束分析
// ==========================================
// 职责: 对比不封顶/封顶两次运行, 量化 CTB 上限造成的产出损失
// 红线: 两次运行天数必须一致, 不一致属于上游缺陷, 直接报 DataShape
// ==========================================

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{ConstrainedDay, CtbAnalysis, Issue};
use crate::domain::plan::PlanResult;
use crate::domain::types::{IssueType, Severity};
use crate::engine::error::{EngineError, EngineResult};
use serde_json::json;
use tracing::warn;

/// CTB 约束分析
///
/// # 参数
/// - `unconstrained`: 不封顶运行结果
/// - `constrained`: 封顶运行结果
///
/// # 返回
/// - Ok(CtbAnalysis)
/// - Err(DataShape): 两次运行天数不一致
pub fn analyze_ctb(
    unconstrained: &PlanResult,
    constrained: &PlanResult,
    thresholds: &AnalysisThresholds,
) -> EngineResult<CtbAnalysis> {
    let u_days = &unconstrained.program_results;
    let c_days = &constrained.program_results;
    if u_days.len() != c_days.len() {
        warn!(
            constrained_len = c_days.len(),
            unconstrained_len = u_days.len(),
            "CTB 对比天数不一致"
        );
        return Err(EngineError::DataShape {
            context: "CTB 约束对比".to_string(),
            constrained_len: c_days.len(),
            unconstrained_len: u_days.len(),
        });
    }

    let unconstrained_total = unconstrained.summary.total_output;
    let constraint_impact = unconstrained_total - constrained.summary.total_output;
    let impact_percent = if unconstrained_total > 0.0 {
        constraint_impact / unconstrained_total * 100.0
    } else {
        0.0
    };

    let constrained_days: Vec<ConstrainedDay> = u_days
        .iter()
        .zip(c_days.iter())
        .filter(|(u, c)| u.output_final > c.output_final)
        .map(|(u, c)| ConstrainedDay {
            date: u.date,
            unconstrained_output: u.output_final,
            constrained_output: c.output_final,
            lost_output: u.output_final - c.output_final,
        })
        .collect();

    let has_constraints = constraint_impact > 0.0;
    let mut issues = Vec::new();
    if has_constraints {
        let severity = if impact_percent > thresholds.ctb_critical_percent {
            Severity::Critical
        } else if impact_percent > thresholds.ctb_warning_percent {
            Severity::Warning
        } else {
            Severity::Info
        };
        issues.push(Issue {
            issue_type: IssueType::CtbConstraint,
            severity,
            week_id: None,
            date: None,
            message: format!(
                "CTB 上限使产出减少 {:.0} ({:.1}%), 受限 {} 天",
                constraint_impact,
                impact_percent,
                constrained_days.len()
            ),
            details: json!({
                "unconstrainedOutput": unconstrained_total,
                "constrainedOutput": constrained.summary.total_output,
                "constraintImpact": constraint_impact,
                "impactPercent": impact_percent,
                "constrainedDays": constrained_days.len(),
            }),
        });
    }

    Ok(CtbAnalysis {
        issues,
        has_constraints,
        constraint_impact,
        impact_percent,
        constrained_days,
    })
}
