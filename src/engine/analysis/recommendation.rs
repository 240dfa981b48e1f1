// ==========================================
// 产量计划仿真与分析系统 - 建议规则
// ==========================================
// 职责: 按固定顺序评估建议规则, 每条规则至多产出一条建议
// 输出: 按优先级 high → medium → low 稳定排序 (同级保持规则顺序)
// ==========================================

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{
    CtbAnalysis, GapAnalysis, Recommendation, RampAnalysis, StabilityAnalysis,
};
use crate::domain::types::{IssueType, Priority, RampHealth, Severity};

/// 规则评估所需的子分析视图
pub struct RuleContext<'a> {
    pub gap: &'a GapAnalysis,
    pub ctb: &'a CtbAnalysis,
    pub stability: &'a StabilityAnalysis,
    pub ramp: &'a RampAnalysis,
    pub thresholds: &'a AnalysisThresholds,
}

// ==========================================
// RecommendationRule - 建议规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationRule {
    CriticalGap,
    WarningGap,
    MinorGap,
    CtbImpact,
    OutputSpikes,
    RampHealth,
}

impl RecommendationRule {
    /// 评估顺序
    pub const ALL: [RecommendationRule; 6] = [
        RecommendationRule::CriticalGap,
        RecommendationRule::WarningGap,
        RecommendationRule::MinorGap,
        RecommendationRule::CtbImpact,
        RecommendationRule::OutputSpikes,
        RecommendationRule::RampHealth,
    ];

    /// 评估单条规则
    ///
    /// # 返回
    /// - Some(Recommendation): 条件命中
    /// - None: 条件未命中
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        match self {
            RecommendationRule::CriticalGap => gap_tier(
                ctx.gap,
                Severity::Critical,
                Priority::High,
                "严重需求缺口",
                "对达成率低于 80% 的周启用加班或延长班时, 并评估新增站点产能",
            ),
            RecommendationRule::WarningGap => gap_tier(
                ctx.gap,
                Severity::Warning,
                Priority::Medium,
                "中度需求缺口",
                "提前相邻周投入或调整出货节奏, 补足达成率 80%~90% 的周",
            ),
            RecommendationRule::MinorGap => gap_tier(
                ctx.gap,
                Severity::Info,
                Priority::Low,
                "轻微需求缺口",
                "与需求方确认轻微缺口周的交付弹性, 必要时微调班次",
            ),
            RecommendationRule::CtbImpact => {
                if !ctx.ctb.has_constraints
                    || ctx.ctb.impact_percent <= ctx.thresholds.ctb_recommend_percent
                {
                    return None;
                }
                Some(Recommendation {
                    priority: Priority::High,
                    category: IssueType::CtbConstraint,
                    title: "解除 CTB 约束".to_string(),
                    action: format!(
                        "针对 {} 个受限日协调工装/物料到位, 提升当日 CTB 上限",
                        ctx.ctb.constrained_days.len()
                    ),
                    expected_impact: format!(
                        "最多可恢复产出 {:.0} ({:.1}%)",
                        ctx.ctb.constraint_impact, ctx.ctb.impact_percent
                    ),
                    affected_weeks: Vec::new(),
                    affected_dates: ctx.ctb.constrained_days.iter().map(|d| d.date).collect(),
                })
            }
            RecommendationRule::OutputSpikes => {
                if ctx.stability.spikes.is_empty() {
                    return None;
                }
                Some(Recommendation {
                    priority: Priority::Medium,
                    category: IssueType::Stability,
                    title: "平滑产出波动".to_string(),
                    action: format!(
                        "检查 {} 个产出突变日的投入安排与班次切换, 平滑日投入",
                        ctx.stability.spikes.len()
                    ),
                    expected_impact: format!(
                        "降低日产出波动率 (当前 {:.1}%)",
                        ctx.stability.volatility
                    ),
                    affected_weeks: Vec::new(),
                    affected_dates: ctx.stability.spikes.iter().map(|s| s.date).collect(),
                })
            }
            RecommendationRule::RampHealth => {
                let (priority, title, action) = match ctx.ramp.ramp_health {
                    RampHealth::Healthy => return None,
                    RampHealth::Suboptimal => (
                        Priority::Medium,
                        "调整爬坡曲线",
                        "复核站点爬坡预设与爬坡起始日, 使爬坡比落在 1.2~3 之间",
                    ),
                    RampHealth::Unknown => (
                        Priority::Low,
                        "补充爬坡观测数据",
                        "延长计划区间至少覆盖两个完整观测窗口后重新评估爬坡",
                    ),
                };
                Some(Recommendation {
                    priority,
                    category: IssueType::Ramp,
                    title: title.to_string(),
                    action: action.to_string(),
                    expected_impact: match ctx.ramp.ramp_ratio {
                        Some(ratio) => format!("当前爬坡比 {:.2}", ratio),
                        None => "爬坡健康度可评估".to_string(),
                    },
                    affected_weeks: Vec::new(),
                    affected_dates: Vec::new(),
                })
            }
        }
    }
}

/// 按固定顺序评估全部规则并稳定排序
pub fn generate_recommendations(ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = RecommendationRule::ALL
        .iter()
        .filter_map(|rule| rule.evaluate(ctx))
        .collect();
    // sort_by_key 为稳定排序
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

fn gap_tier(
    gap: &GapAnalysis,
    severity: Severity,
    priority: Priority,
    title: &str,
    action: &str,
) -> Option<Recommendation> {
    let tier: Vec<_> = gap.issues.iter().filter(|i| i.severity == severity).collect();
    if tier.is_empty() {
        return None;
    }

    let shortfall: f64 = tier
        .iter()
        .filter_map(|i| i.details.get("gap").and_then(|g| g.as_f64()))
        .sum();

    Some(Recommendation {
        priority,
        category: IssueType::Gap,
        title: title.to_string(),
        action: action.to_string(),
        expected_impact: format!("补足 {} 周共 {:.0} 的出货缺口", tier.len(), -shortfall),
        affected_weeks: tier.iter().filter_map(|i| i.week_id).collect(),
        affected_dates: Vec::new(),
    })
}
