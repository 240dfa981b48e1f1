// ==========================================
// 产量计划仿真与分析系统 - 计划分析引擎
// ==========================================
// 职责: 对仿真结果运行四项独立子分析, 输出问题/评分/建议
// 输入: PlanOutcome (组合模式时同时携带封顶与不封顶结果)
// 输出: AnalysisResult
// 红线: 对结构完整的结果不报错, 数据不足降级为 unknown/中性结果
// ==========================================

pub mod ctb;
pub mod gap;
pub mod ramp;
pub mod recommendation;
pub mod scoring;
pub mod stability;

#[cfg(test)]
mod fixtures;

use crate::config::engine_params::AnalysisThresholds;
use crate::domain::analysis::{AnalysisResult, AnalysisSummary, CtbAnalysis};
use crate::domain::plan::{PlanConfig, PlanOutcome};
use crate::domain::types::OverallHealth;
use crate::engine::error::EngineResult;
use recommendation::{generate_recommendations, RuleContext};
use tracing::{debug, info, instrument};

// 重导出
pub use recommendation::RecommendationRule;

// ==========================================
// PlanAnalysisEngine - 计划分析引擎
// ==========================================
pub struct PlanAnalysisEngine {
    thresholds: AnalysisThresholds,
}

impl PlanAnalysisEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `thresholds`: 分析阈值 (通常由 ConfigManager 加载)
    pub fn new(thresholds: AnalysisThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    /// 分析计划
    ///
    /// 组合模式: 封顶结果驱动缺口/稳定性/爬坡, CTB 对比不封顶与封顶;
    /// 单模式: CTB 跳过
    ///
    /// # 参数
    /// - `outcome`: 仿真结果
    /// - `config`: 生成该结果的计划配置
    ///
    /// # 返回
    /// - Ok(AnalysisResult)
    /// - Err(DataShape): 组合模式两次运行天数不一致
    #[instrument(skip(self, outcome, config), fields(mode = %outcome.mode(), sites_count = config.sites.len()))]
    pub fn analyze_plan(
        &self,
        outcome: &PlanOutcome,
        config: &PlanConfig,
    ) -> EngineResult<AnalysisResult> {
        let plan = outcome.primary();

        // 1. 四项子分析
        let gap_analysis = gap::analyze_gap(&plan.weekly_metrics, &self.thresholds);
        let ctb_analysis = match outcome.unconstrained() {
            Some(unconstrained) => ctb::analyze_ctb(unconstrained, plan, &self.thresholds)?,
            None => {
                debug!("单模式结果, 跳过 CTB 约束分析");
                CtbAnalysis::skipped()
            }
        };
        let stability_analysis =
            stability::analyze_stability(&plan.program_results, &self.thresholds);
        let ramp_analysis = ramp::analyze_ramp(&plan.program_results, &self.thresholds);

        // 2. 问题汇总 (顺序: gap, ctb, stability, ramp)
        let issues: Vec<_> = gap_analysis
            .issues
            .iter()
            .chain(ctb_analysis.issues.iter())
            .chain(stability_analysis.issues.iter())
            .chain(ramp_analysis.issues.iter())
            .cloned()
            .collect();

        // 3. 评分
        let scores = scoring::score(
            &gap_analysis,
            &ctb_analysis,
            &stability_analysis,
            &ramp_analysis,
        );
        let overall_health = OverallHealth::from_score(scores.overall);

        // 4. 建议
        let recommendations = generate_recommendations(&RuleContext {
            gap: &gap_analysis,
            ctb: &ctb_analysis,
            stability: &stability_analysis,
            ramp: &ramp_analysis,
            thresholds: &self.thresholds,
        });

        let summary = AnalysisSummary::from_issues(&issues, overall_health);
        info!(
            total_issues = summary.total_issues,
            critical_issues = summary.critical_issues,
            overall = scores.overall,
            %overall_health,
            "计划分析完成"
        );

        Ok(AnalysisResult {
            gap_analysis,
            ctb_analysis,
            stability_analysis,
            ramp_analysis,
            issues,
            recommendations,
            scores,
            summary,
        })
    }
}

impl Default for PlanAnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisThresholds::default())
    }
}
