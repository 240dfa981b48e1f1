// ==========================================
// 产量计划仿真与分析系统 - 领域模型层
// ==========================================
// 职责: 定义基础数据、计划配置、仿真结果、分析结果等数据契约
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod analysis;
pub mod plan;
pub mod seed;
pub mod types;
pub mod week;

// 重导出核心类型
pub use analysis::{
    AnalysisResult, AnalysisScores, AnalysisSummary, ConstrainedDay, CtbAnalysis, GapAnalysis,
    Issue, OutputSpike, RampAnalysis, Recommendation, StabilityAnalysis,
};
pub use plan::{
    CombinedPlanResult, DateRange, DayRecord, PlanConfig, PlanOutcome, PlanResult, PlanSummary,
    ProgramResult, WeekMetric,
};
pub use seed::{DemandEntry, DemandTable, SeedData, SiteSeed};
pub use types::{IssueType, OverallHealth, PlanMode, Priority, RampHealth, Severity};
pub use week::WeekId;
