// ==========================================
// 产量计划仿真与分析系统 - 计划分析结果
// ==========================================
// 职责: Issue / Recommendation / 四项子分析 / 评分 / 汇总
// 红线: 所有问题必须带可读 message + 结构化 details (可解释性)
// ==========================================

use crate::domain::types::{IssueType, OverallHealth, Priority, RampHealth, Severity};
use crate::domain::week::WeekId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// Issue - 分析问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub week_id: Option<WeekId>,
    pub date: Option<NaiveDate>,
    pub message: String,
    pub details: JsonValue,
}

// ==========================================
// Recommendation - 处置建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub category: IssueType,
    pub title: String,
    pub action: String,
    pub expected_impact: String,
    pub affected_weeks: Vec<WeekId>,
    pub affected_dates: Vec<NaiveDate>,
}

// ==========================================
// 子分析结果
// ==========================================

/// 缺口分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub issues: Vec<Issue>,
    pub total_gap: f64,        // 负缺口之和 (<= 0)
    pub avg_attainment: f64,   // 缺口周平均达成率, 无缺口周时 100
    pub weeks_with_gap: usize,
    pub total_weeks: usize,
}

/// CTB 约束受限日
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstrainedDay {
    pub date: NaiveDate,
    pub unconstrained_output: f64,
    pub constrained_output: f64,
    pub lost_output: f64,
}

/// CTB 约束分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtbAnalysis {
    pub issues: Vec<Issue>,
    pub has_constraints: bool,
    pub constraint_impact: f64,
    pub impact_percent: f64,
    pub constrained_days: Vec<ConstrainedDay>,
}

impl CtbAnalysis {
    /// 无对照数据时的空结果
    pub fn skipped() -> Self {
        Self {
            issues: Vec::new(),
            has_constraints: false,
            constraint_impact: 0.0,
            impact_percent: 0.0,
            constrained_days: Vec::new(),
        }
    }
}

/// 产出突变点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpike {
    pub date: NaiveDate,
    pub previous_output: f64,
    pub current_output: f64,
    pub change_percent: f64,
}

/// 稳定性分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityAnalysis {
    pub issues: Vec<Issue>,
    pub volatility: f64,
    pub spikes: Vec<OutputSpike>,
}

/// 爬坡分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RampAnalysis {
    pub issues: Vec<Issue>,
    pub ramp_health: RampHealth,
    pub ramp_ratio: Option<f64>,
    pub first_window_output: f64,
    pub last_window_output: f64,
}

// ==========================================
// 评分与汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisScores {
    pub gap_score: f64,
    pub ctb_score: f64,
    pub stability_score: f64,
    pub ramp_score: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
    pub overall_health: OverallHealth,
}

impl AnalysisSummary {
    /// 按严重度统计问题数
    pub fn from_issues(issues: &[Issue], overall_health: OverallHealth) -> Self {
        let count = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
        Self {
            total_issues: issues.len(),
            critical_issues: count(Severity::Critical),
            warning_issues: count(Severity::Warning),
            info_issues: count(Severity::Info),
            overall_health,
        }
    }
}

// ==========================================
// AnalysisResult - 分析引擎输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub gap_analysis: GapAnalysis,
    pub ctb_analysis: CtbAnalysis,
    pub stability_analysis: StabilityAnalysis,
    pub ramp_analysis: RampAnalysis,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    pub scores: AnalysisScores,
    pub summary: AnalysisSummary,
}
