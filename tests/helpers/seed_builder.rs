// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use production_plan_aps::domain::plan::{PlanResult, PlanSummary, ProgramResult, WeekMetric};
use production_plan_aps::domain::seed::{DemandEntry, DemandTable, SeedData, SiteSeed};
use production_plan_aps::domain::types::PlanMode;
use production_plan_aps::domain::week::WeekId;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 日期快捷构造
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 测试基准日 2025-01-05 (周日)
pub fn base_day() -> NaiveDate {
    d(2025, 1, 5)
}

// ==========================================
// SiteSeed 构建器
// ==========================================
pub struct SiteBuilder {
    site: SiteSeed,
}

impl SiteBuilder {
    pub fn new(site_id: &str) -> Self {
        Self {
            site: SiteSeed {
                site_id: site_id.to_string(),
                daily_capacity: 100.0,
                nominal_shift_hours: 10.0,
                ramp_preset: "flat".to_string(),
                ramp_start: d(2024, 12, 1),
                lead_time_input_to_output_days: 0,
                lead_time_output_to_shipment_days: 0,
                ctb_limits: BTreeMap::new(),
            },
        }
    }

    pub fn capacity(mut self, capacity: f64) -> Self {
        self.site.daily_capacity = capacity;
        self
    }

    pub fn ramp(mut self, preset: &str, start: NaiveDate) -> Self {
        self.site.ramp_preset = preset.to_string();
        self.site.ramp_start = start;
        self
    }

    pub fn lead_times(mut self, input_to_output: u32, output_to_shipment: u32) -> Self {
        self.site.lead_time_input_to_output_days = input_to_output;
        self.site.lead_time_output_to_shipment_days = output_to_shipment;
        self
    }

    pub fn ctb(mut self, date: NaiveDate, limit: f64) -> Self {
        self.site.ctb_limits.insert(date, limit);
        self
    }

    /// 区间内每日同一 CTB 上限
    pub fn ctb_range(mut self, start: NaiveDate, end: NaiveDate, limit: f64) -> Self {
        for date in start.iter_days().take_while(|x| *x <= end) {
            self.site.ctb_limits.insert(date, limit);
        }
        self
    }

    pub fn build(self) -> SiteSeed {
        self.site
    }
}

// ==========================================
// SeedData 构建器
// ==========================================
pub struct SeedBuilder {
    sites: Vec<SiteSeed>,
    demand: Vec<DemandEntry>,
}

impl SeedBuilder {
    pub fn new() -> Self {
        Self {
            sites: Vec::new(),
            demand: Vec::new(),
        }
    }

    pub fn site(mut self, site: SiteSeed) -> Self {
        self.sites.push(site);
        self
    }

    pub fn demand(mut self, week_start: NaiveDate, demand: f64) -> Self {
        self.demand.push(DemandEntry {
            week_id: WeekId(week_start),
            demand,
        });
        self
    }

    /// 从 first_week 起连续 weeks 周相同需求
    pub fn weekly_demand(mut self, first_week: NaiveDate, weeks: usize, demand: f64) -> Self {
        for i in 0..weeks {
            self.demand.push(DemandEntry {
                week_id: WeekId(first_week + Duration::weeks(i as i64)),
                demand,
            });
        }
        self
    }

    pub fn build(self) -> SeedData {
        SeedData {
            sites: self.sites,
            demand: DemandTable::new(self.demand),
        }
    }
}

// ==========================================
// PlanResult 直接构造 (绕过仿真, 用于分析场景)
// ==========================================

/// 由每日产出序列构造 PlanResult (投入=产出=出货, 爬坡满载, 无周指标)
pub fn plan_from_outputs(mode: PlanMode, start: NaiveDate, outputs: &[f64]) -> PlanResult {
    let mut cum = 0.0;
    let program_results: Vec<ProgramResult> = outputs
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            cum += value;
            ProgramResult {
                date: start + Duration::days(idx as i64),
                ramp_utilization: 1.0,
                input_unconstrained: value,
                ctb_daily: None,
                input_final: value,
                output_final: value,
                shipment_final: value,
                cum_input: cum,
                cum_output: cum,
                cum_shipment: cum,
            }
        })
        .collect();

    PlanResult {
        mode,
        summary: PlanSummary {
            total_output: outputs.iter().sum(),
            total_shipment: outputs.iter().sum(),
            overall_attainment: 100.0,
            weeks_with_gap: BTreeSet::new(),
        },
        program_results,
        site_results: BTreeMap::new(),
        weekly_metrics: Vec::<WeekMetric>::new(),
    }
}

// ==========================================
// 文件辅助
// ==========================================

/// 在目录下写入 CSV 文件
pub fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}
