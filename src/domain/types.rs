// ==========================================
// 产量计划仿真与分析系统 - 领域类型定义
// ==========================================
// 职责: 计划模式、问题类型、严重度、优先级、健康度等枚举
// 序列化格式: snake_case (与下游渲染/导出/对比组件约定一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 计划模式 (Plan Mode)
// ==========================================
// constrained: 应用 CTB 日上限
// unconstrained: 仅爬坡曲线,不封顶
// combined: 两次运行 (封顶 + 不封顶) 同时返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    Constrained,
    Unconstrained,
    Combined,
}

impl PlanMode {
    /// 该模式下的投入是否受 CTB 上限约束
    pub fn applies_caps(&self) -> bool {
        matches!(self, PlanMode::Constrained | PlanMode::Combined)
    }

    /// 从字符串解析模式（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "constrained" => Some(PlanMode::Constrained),
            "unconstrained" => Some(PlanMode::Unconstrained),
            "combined" => Some(PlanMode::Combined),
            _ => None,
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanMode::Constrained => write!(f, "constrained"),
            PlanMode::Unconstrained => write!(f, "unconstrained"),
            PlanMode::Combined => write!(f, "combined"),
        }
    }
}

// ==========================================
// 问题类型 (Issue Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Gap,           // 需求缺口
    CtbConstraint, // 产能/工装/物料约束
    Stability,     // 产出波动
    Ramp,          // 爬坡健康
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Gap => write!(f, "gap"),
            IssueType::CtbConstraint => write!(f, "ctb_constraint"),
            IssueType::Stability => write!(f, "stability"),
            IssueType::Ramp => write!(f, "ramp"),
        }
    }
}

// ==========================================
// 严重度 (Severity)
// ==========================================
// 顺序: Info < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 建议优先级 (Priority)
// ==========================================
// 排序: High < Medium < Low (排在前面的优先)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

// ==========================================
// 爬坡健康度 (Ramp Health)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampHealth {
    Healthy,    // 爬坡比在合理区间
    Suboptimal, // 过慢或过激
    Unknown,    // 数据不足
}

impl fmt::Display for RampHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RampHealth::Healthy => write!(f, "healthy"),
            RampHealth::Suboptimal => write!(f, "suboptimal"),
            RampHealth::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// 计划总体健康度 (Overall Health)
// ==========================================
// 由 overall 综合分映射: >=90 / >=75 / >=60 / >=40 / <40
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl OverallHealth {
    /// 由综合分映射健康度
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            OverallHealth::Excellent
        } else if score >= 75.0 {
            OverallHealth::Good
        } else if score >= 60.0 {
            OverallHealth::Fair
        } else if score >= 40.0 {
            OverallHealth::Poor
        } else {
            OverallHealth::Critical
        }
    }
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallHealth::Excellent => write!(f, "excellent"),
            OverallHealth::Good => write!(f, "good"),
            OverallHealth::Fair => write!(f, "fair"),
            OverallHealth::Poor => write!(f, "poor"),
            OverallHealth::Critical => write!(f, "critical"),
        }
    }
}
