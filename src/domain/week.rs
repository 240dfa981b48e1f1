// ==========================================
// 产量计划仿真与分析系统 - 周标识
// ==========================================
// 周标识 = 该周起始日 (默认周日) 的日期, 序列化为 "YYYY-MM-DD"
// 仿真引擎与分析引擎共用同一口径
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 周标识 (周起始日)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekId(pub NaiveDate);

impl WeekId {
    /// 周起始日
    pub fn start_date(&self) -> NaiveDate {
        self.0
    }

    /// 从 "YYYY-MM-DD" 解析
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(WeekId)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
