// ==========================================
// 产量计划仿真与分析系统 - 基础数据结构校验
// ==========================================
// 职责: 基础数据快速失败校验 (导入层与仿真引擎共用)
// 规则: 站点唯一 / 产能与班时合法 / CTB 上限非负 / 需求周对齐且严格递增
// ==========================================

use crate::domain::seed::{SeedData, SiteSeed};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::week_scheme::WeekScheme;
use std::collections::HashSet;

/// 校验全部站点与需求表
pub fn validate_seed_data(seed: &SeedData, scheme: &WeekScheme) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for site in &seed.sites {
        if !seen.insert(site.site_id.as_str()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "站点重复: {}",
                site.site_id
            )));
        }
        validate_site(site)?;
    }
    validate_demand(seed, scheme)
}

/// 校验单个站点
pub fn validate_site(site: &SiteSeed) -> EngineResult<()> {
    let invalid = |reason: String| {
        EngineError::InvalidConfiguration(format!("站点 {} 数据无效: {}", site.site_id, reason))
    };

    if site.site_id.trim().is_empty() {
        return Err(EngineError::InvalidConfiguration("站点ID为空".to_string()));
    }
    if !site.daily_capacity.is_finite() || site.daily_capacity < 0.0 {
        return Err(invalid(format!("日产能={}", site.daily_capacity)));
    }
    if !site.nominal_shift_hours.is_finite() || site.nominal_shift_hours <= 0.0 {
        return Err(invalid(format!("标准班时={}", site.nominal_shift_hours)));
    }
    if let Some((date, limit)) = site
        .ctb_limits
        .iter()
        .find(|(_, limit)| !limit.is_finite() || **limit < 0.0)
    {
        return Err(invalid(format!("CTB 上限 {}={}", date, limit)));
    }
    Ok(())
}

/// 校验需求表: 周标识对齐周起始日且严格递增, 需求非负
pub fn validate_demand(seed: &SeedData, scheme: &WeekScheme) -> EngineResult<()> {
    let entries = &seed.demand.entries;
    for (idx, entry) in entries.iter().enumerate() {
        if !scheme.is_week_start(entry.week_id.start_date()) {
            return Err(EngineError::InvalidConfiguration(format!(
                "需求周 {} 未对齐周起始日 {:?}",
                entry.week_id, scheme.start_day
            )));
        }
        if !entry.demand.is_finite() || entry.demand < 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "需求周 {} 需求量无效: {}",
                entry.week_id, entry.demand
            )));
        }
        if idx > 0 && entry.week_id <= entries[idx - 1].week_id {
            return Err(EngineError::InvalidConfiguration(format!(
                "需求表非单调: {} 出现在 {} 之后",
                entry.week_id,
                entries[idx - 1].week_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::{DemandEntry, DemandTable};
    use crate::domain::week::WeekId;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn site(id: &str) -> SiteSeed {
        SiteSeed {
            site_id: id.to_string(),
            daily_capacity: 100.0,
            nominal_shift_hours: 10.0,
            ramp_preset: "flat".to_string(),
            ramp_start: d(1, 1),
            lead_time_input_to_output_days: 0,
            lead_time_output_to_shipment_days: 0,
            ctb_limits: BTreeMap::new(),
        }
    }

    fn demand(weeks: &[(u32, u32)]) -> DemandTable {
        DemandTable::new(
            weeks
                .iter()
                .map(|&(m, day)| DemandEntry {
                    week_id: WeekId(d(m, day)),
                    demand: 100.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_valid_seed() {
        let seed = SeedData {
            sites: vec![site("S1"), site("S2")],
            demand: demand(&[(1, 5), (1, 12)]),
        };
        assert!(validate_seed_data(&seed, &WeekScheme::sunday_start()).is_ok());
    }

    #[test]
    fn test_duplicate_site() {
        let seed = SeedData {
            sites: vec![site("S1"), site("S1")],
            demand: DemandTable::default(),
        };
        assert!(validate_seed_data(&seed, &WeekScheme::sunday_start()).is_err());
    }

    #[test]
    fn test_non_monotonic_demand() {
        let seed = SeedData {
            sites: vec![site("S1")],
            demand: demand(&[(1, 12), (1, 5)]),
        };
        let err = validate_seed_data(&seed, &WeekScheme::sunday_start()).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("非单调"));
    }

    #[test]
    fn test_misaligned_demand_week() {
        let seed = SeedData {
            sites: vec![site("S1")],
            demand: demand(&[(1, 6)]),
        };
        assert!(validate_seed_data(&seed, &WeekScheme::sunday_start()).is_err());
    }

    #[test]
    fn test_negative_ctb_limit() {
        let mut s = site("S1");
        s.ctb_limits.insert(d(1, 3), -5.0);
        assert!(validate_site(&s).is_err());
    }

    #[test]
    fn test_invalid_capacity() {
        let mut s = site("S1");
        s.daily_capacity = f64::NAN;
        assert!(validate_site(&s).is_err());
        let mut s = site("S1");
        s.nominal_shift_hours = 0.0;
        assert!(validate_site(&s).is_err());
    }
}
