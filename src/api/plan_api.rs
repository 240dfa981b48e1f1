// ==========================================
// 产量计划仿真与分析系统 - 计划 API
// ==========================================
// 职责: 计划仿真 / 计划分析 / 一次运行 / 计划对比
// 说明: 引擎为纯函数, API 只负责参数装配与错误转换
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::analysis::AnalysisResult;
use crate::domain::plan::{PlanConfig, PlanOutcome, PlanResult};
use crate::domain::seed::SeedData;
use crate::domain::week::WeekId;
use crate::engine::{PlanAnalysisEngine, SimulationEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// PlanRun - 一次完整运行的结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRun {
    pub config: PlanConfig,
    pub plan: PlanOutcome,
    pub analysis: AnalysisResult,
}

// ==========================================
// PlanComparison - 计划对比结果
// ==========================================
// 仅读取 summary 的 totalOutput / totalShipment / overallAttainment / weeksWithGap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    pub total_output_a: f64,
    pub total_output_b: f64,
    pub total_output_delta: f64,
    pub total_shipment_a: f64,
    pub total_shipment_b: f64,
    pub total_shipment_delta: f64,
    pub overall_attainment_a: f64,
    pub overall_attainment_b: f64,
    pub overall_attainment_delta: f64,
    pub gap_weeks_only_in_a: Vec<WeekId>, // B 已补足的缺口周
    pub gap_weeks_only_in_b: Vec<WeekId>, // B 新出现的缺口周
    pub gap_weeks_in_both: Vec<WeekId>,
}

// ==========================================
// PlanApi - 计划 API
// ==========================================
pub struct PlanApi {
    simulation_engine: Arc<SimulationEngine>,
    analysis_engine: Arc<PlanAnalysisEngine>,
}

impl PlanApi {
    /// 创建新的PlanApi实例
    pub fn new(
        simulation_engine: Arc<SimulationEngine>,
        analysis_engine: Arc<PlanAnalysisEngine>,
    ) -> Self {
        Self {
            simulation_engine,
            analysis_engine,
        }
    }

    /// 从配置库装配引擎
    pub fn from_config(config_manager: &ConfigManager) -> ApiResult<Self> {
        let ramp_curves = config_manager
            .get_ramp_curve_table()
            .map_err(|e| ApiError::ConfigStoreError(e.to_string()))?;
        let params = config_manager
            .get_simulation_params()
            .map_err(|e| ApiError::ConfigStoreError(e.to_string()))?;
        let thresholds = config_manager
            .get_analysis_thresholds()
            .map_err(|e| ApiError::ConfigStoreError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(SimulationEngine::new(ramp_curves, params)),
            Arc::new(PlanAnalysisEngine::new(thresholds)),
        ))
    }

    // ==========================================
    // 仿真与分析
    // ==========================================

    /// 生成计划 (区间与模式取自计划配置)
    pub fn generate_plan(&self, config: &PlanConfig, seed: &SeedData) -> ApiResult<PlanOutcome> {
        Ok(self.simulation_engine.generate_plan(
            config.date_range.start,
            config.date_range.end,
            config.mode,
            seed,
            config,
        )?)
    }

    /// 分析计划
    pub fn analyze_plan(
        &self,
        outcome: &PlanOutcome,
        config: &PlanConfig,
    ) -> ApiResult<AnalysisResult> {
        if outcome.mode() != config.mode {
            return Err(ApiError::InvalidInput(format!(
                "计划结果模式 {} 与配置模式 {} 不一致",
                outcome.mode(),
                config.mode
            )));
        }
        Ok(self.analysis_engine.analyze_plan(outcome, config)?)
    }

    /// 仿真 + 分析
    #[instrument(skip(self, config, seed), fields(mode = %config.mode))]
    pub fn run(&self, config: &PlanConfig, seed: &SeedData) -> ApiResult<PlanRun> {
        let plan = self.generate_plan(config, seed)?;
        let analysis = self.analyze_plan(&plan, config)?;
        Ok(PlanRun {
            config: config.clone(),
            plan,
            analysis,
        })
    }

    // ==========================================
    // 计划对比
    // ==========================================

    /// 计划对比 (B 相对 A 的差值)
    pub fn compare_plans(&self, a: &PlanResult, b: &PlanResult) -> PlanComparison {
        let (sa, sb) = (&a.summary, &b.summary);

        PlanComparison {
            total_output_a: sa.total_output,
            total_output_b: sb.total_output,
            total_output_delta: sb.total_output - sa.total_output,
            total_shipment_a: sa.total_shipment,
            total_shipment_b: sb.total_shipment,
            total_shipment_delta: sb.total_shipment - sa.total_shipment,
            overall_attainment_a: sa.overall_attainment,
            overall_attainment_b: sb.overall_attainment,
            overall_attainment_delta: sb.overall_attainment - sa.overall_attainment,
            gap_weeks_only_in_a: sa.weeks_with_gap.difference(&sb.weeks_with_gap).copied().collect(),
            gap_weeks_only_in_b: sb.weeks_with_gap.difference(&sa.weeks_with_gap).copied().collect(),
            gap_weeks_in_both: sa
                .weeks_with_gap
                .intersection(&sb.weeks_with_gap)
                .copied()
                .collect(),
        }
    }
}

impl Default for PlanApi {
    fn default() -> Self {
        Self::new(
            Arc::new(SimulationEngine::default()),
            Arc::new(PlanAnalysisEngine::default()),
        )
    }
}
