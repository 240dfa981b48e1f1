// ==========================================
// InsightAnnotator 集成测试
// ==========================================
// 测试目标: 解读服务超时 / 失败 / 取消均不影响数值结果
// ==========================================

mod helpers;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use helpers::*;
use production_plan_aps::domain::types::PlanMode;
use production_plan_aps::domain::PlanConfig;
use production_plan_aps::insight::{InsightAnnotator, InsightProvider, InsightRequest};
use production_plan_aps::PlanApi;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct SlowProvider {
    delay: Duration,
}

#[async_trait]
impl InsightProvider for SlowProvider {
    async fn describe(&self, _request: &InsightRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        tokio::time::sleep(self.delay).await;
        Ok("late".to_string())
    }
}

struct FailingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl InsightProvider for FailingProvider {
    async fn describe(&self, _request: &InsightRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("upstream 503".into())
    }
}

struct SummaryProvider;

#[async_trait]
impl InsightProvider for SummaryProvider {
    async fn describe(&self, request: &InsightRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(format!(
            "health={} issues={} recs={}",
            request.overall_health,
            request.total_issues,
            request.top_recommendations.len()
        ))
    }
}

/// 组合模式 + CTB 受限 + 缺口, 建议数 > 3
fn analyzed_request() -> InsightRequest {
    let start = base_day();
    let end = start + ChronoDuration::days(20);
    let seed = SeedBuilder::new()
        .site(
            SiteBuilder::new("S1")
                .capacity(100.0)
                .ramp("standard", start)
                .ctb_range(start + ChronoDuration::days(8), start + ChronoDuration::days(9), 10.0)
                .build(),
        )
        .weekly_demand(start, 3, 650.0)
        .build();
    let config = PlanConfig::new(start, end, PlanMode::Combined, &["S1"]);
    let run = PlanApi::default().run(&config, &seed).unwrap();
    InsightRequest::from_analysis(&run.analysis)
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let annotator = InsightAnnotator::new(
        Arc::new(SlowProvider {
            delay: Duration::from_millis(500),
        }),
        Duration::from_millis(20),
    );

    let outcome = annotator.annotate(analyzed_request()).await;
    assert!(!outcome.available);
    assert!(outcome.text.is_none());
}

#[tokio::test]
async fn test_failing_provider_is_swallowed() {
    let provider = Arc::new(FailingProvider {
        calls: AtomicUsize::new(0),
    });
    let annotator = InsightAnnotator::new(provider.clone(), Duration::from_secs(1));

    let outcome = annotator.annotate(analyzed_request()).await;
    assert!(!outcome.available);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_spawned_annotation_can_be_aborted() {
    let annotator = InsightAnnotator::new(
        Arc::new(SlowProvider {
            delay: Duration::from_secs(30),
        }),
        Duration::from_secs(60),
    );

    let handle = annotator.spawn(analyzed_request());
    handle.abort();
    let joined = handle.await;
    assert!(joined.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_request_summarizes_analysis() {
    let request = analyzed_request();
    assert!(request.total_issues > 0);
    assert!(request.top_recommendations.len() <= InsightRequest::MAX_RECOMMENDATIONS);
    assert!(request.impact_percent > 0.0);

    let annotator = InsightAnnotator::new(Arc::new(SummaryProvider), Duration::from_secs(1));
    let outcome = annotator.spawn(request.clone()).await.unwrap();
    assert!(outcome.available);
    assert_eq!(
        outcome.text.unwrap(),
        format!(
            "health={} issues={} recs={}",
            request.overall_health,
            request.total_issues,
            request.top_recommendations.len()
        )
    );

    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("overallHealth").is_some());
    assert!(value.get("topRecommendations").is_some());
}
