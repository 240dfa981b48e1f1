// ==========================================
// 产量计划仿真与分析系统 - 文字解读接入点
// ==========================================
// 职责: 定义可选的文字解读服务 trait, 以超时 + 失败吞没的方式调用
// 说明: 数值结果先于解读产出, 解读失败/超时只返回 available=false
// 红线: 解读层不修改、不阻塞 AnalysisResult
// ==========================================

use crate::domain::analysis::AnalysisResult;
use crate::domain::types::{OverallHealth, RampHealth};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 默认超时 (毫秒)
pub const DEFAULT_INSIGHT_TIMEOUT_MS: u64 = 10_000;

// ==========================================
// InsightRequest - 解读请求 (分析结果摘要)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub overall_health: OverallHealth,
    pub overall_score: f64,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub weeks_with_gap: usize,
    pub total_gap: f64,
    pub impact_percent: f64,
    pub volatility: f64,
    pub ramp_health: RampHealth,
    pub top_recommendations: Vec<String>,
}

impl InsightRequest {
    /// 最多携带的建议标题数
    pub const MAX_RECOMMENDATIONS: usize = 3;

    /// 由分析结果构造摘要快照
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        Self {
            overall_health: analysis.summary.overall_health,
            overall_score: analysis.scores.overall,
            total_issues: analysis.summary.total_issues,
            critical_issues: analysis.summary.critical_issues,
            warning_issues: analysis.summary.warning_issues,
            weeks_with_gap: analysis.gap_analysis.weeks_with_gap,
            total_gap: analysis.gap_analysis.total_gap,
            impact_percent: analysis.ctb_analysis.impact_percent,
            volatility: analysis.stability_analysis.volatility,
            ramp_health: analysis.ramp_analysis.ramp_health,
            top_recommendations: analysis
                .recommendations
                .iter()
                .take(Self::MAX_RECOMMENDATIONS)
                .map(|r| r.title.clone())
                .collect(),
        }
    }
}

// ==========================================
// InsightOutcome - 解读结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightOutcome {
    pub available: bool,
    pub text: Option<String>,
}

impl InsightOutcome {
    pub fn available(text: String) -> Self {
        Self {
            available: true,
            text: Some(text),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            text: None,
        }
    }
}

// ==========================================
// 解读服务 Trait
// ==========================================

/// 文字解读服务
///
/// 由外部适配器实现 (例如语言模型中转服务)
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// 生成解读文本
    async fn describe(&self, request: &InsightRequest) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作解读服务
///
/// 未配置外部服务时使用, 恒返回不可用
#[derive(Debug, Clone, Default)]
pub struct NoOpInsightProvider;

#[async_trait]
impl InsightProvider for NoOpInsightProvider {
    async fn describe(&self, _request: &InsightRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        debug!("NoOpInsightProvider: 未配置解读服务");
        Err("未配置解读服务".into())
    }
}

// ==========================================
// InsightAnnotator - 解读调用器
// ==========================================
pub struct InsightAnnotator {
    provider: Arc<dyn InsightProvider>,
    timeout: Duration,
}

impl InsightAnnotator {
    /// 构造函数
    ///
    /// # 参数
    /// - `provider`: 解读服务
    /// - `timeout`: 单次调用超时
    pub fn new(provider: Arc<dyn InsightProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// 调用解读服务 (失败与超时均转换为 unavailable)
    pub async fn annotate(&self, request: InsightRequest) -> InsightOutcome {
        annotate_with(self.provider.clone(), self.timeout, request).await
    }

    /// 后台调用解读服务
    ///
    /// # 返回
    /// JoinHandle, 调用方可 abort 取消
    pub fn spawn(&self, request: InsightRequest) -> JoinHandle<InsightOutcome> {
        tokio::spawn(annotate_with(self.provider.clone(), self.timeout, request))
    }
}

impl Default for InsightAnnotator {
    fn default() -> Self {
        Self::new(
            Arc::new(NoOpInsightProvider),
            Duration::from_millis(DEFAULT_INSIGHT_TIMEOUT_MS),
        )
    }
}

async fn annotate_with(
    provider: Arc<dyn InsightProvider>,
    timeout: Duration,
    request: InsightRequest,
) -> InsightOutcome {
    match tokio::time::timeout(timeout, provider.describe(&request)).await {
        Ok(Ok(text)) => InsightOutcome::available(text),
        Ok(Err(e)) => {
            warn!(error = %e, "文字解读失败");
            InsightOutcome::unavailable()
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "文字解读超时");
            InsightOutcome::unavailable()
        }
    }
}
