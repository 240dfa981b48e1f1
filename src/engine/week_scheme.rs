// ==========================================
// 产量计划仿真与分析系统 - 周分桶口径
// ==========================================
// 口径: 7 天一周, 默认周日起始; 周标识 = 周起始日
// 红线: 仿真 (周汇总) 与导入校验 (需求表) 必须使用同一口径
// ==========================================

use crate::domain::week::WeekId;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekScheme {
    pub start_day: Weekday,
}

impl Default for WeekScheme {
    fn default() -> Self {
        Self::sunday_start()
    }
}

impl WeekScheme {
    pub fn sunday_start() -> Self {
        Self {
            start_day: Weekday::Sun,
        }
    }

    /// 日期所属周的标识
    pub fn week_id(&self, date: NaiveDate) -> WeekId {
        let offset = (7 + date.weekday().num_days_from_sunday()
            - self.start_day.num_days_from_sunday())
            % 7;
        WeekId(date - Duration::days(offset as i64))
    }

    /// 该日期是否为周起始日
    pub fn is_week_start(&self, date: NaiveDate) -> bool {
        date.weekday() == self.start_day
    }

    /// 从配置字符串解析起始日 ("sun" / "mon" / ...)
    pub fn parse(s: &str) -> Option<Self> {
        s.trim()
            .parse::<Weekday>()
            .ok()
            .map(|start_day| Self { start_day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_sunday_start_bucketing() {
        let scheme = WeekScheme::sunday_start();
        // 2025-01-05 是周日
        assert_eq!(scheme.week_id(d(2025, 1, 5)), WeekId(d(2025, 1, 5)));
        assert_eq!(scheme.week_id(d(2025, 1, 11)), WeekId(d(2025, 1, 5)));
        assert_eq!(scheme.week_id(d(2025, 1, 12)), WeekId(d(2025, 1, 12)));
        // 跨年
        assert_eq!(scheme.week_id(d(2025, 1, 1)), WeekId(d(2024, 12, 29)));
    }

    #[test]
    fn test_monday_start_bucketing() {
        let scheme = WeekScheme::parse("Mon").unwrap();
        assert_eq!(scheme.week_id(d(2025, 1, 5)), WeekId(d(2024, 12, 30)));
        assert_eq!(scheme.week_id(d(2025, 1, 6)), WeekId(d(2025, 1, 6)));
        assert!(scheme.is_week_start(d(2025, 1, 6)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(WeekScheme::parse("someday").is_none());
    }
}
