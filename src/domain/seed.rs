// ==========================================
// 产量计划仿真与分析系统 - 基础数据 (Seed Data)
// ==========================================
// 职责: 站点产能、爬坡曲线分配、交期提前量、CTB 日上限、周需求
// 红线: 只读参考数据, 由调用方加载一次, 引擎不修改
// ==========================================

use crate::domain::week::WeekId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 默认标准班时 (小时)
pub const DEFAULT_NOMINAL_SHIFT_HOURS: f64 = 10.0;

fn default_nominal_shift_hours() -> f64 {
    DEFAULT_NOMINAL_SHIFT_HOURS
}

// ==========================================
// SiteSeed - 站点基础数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSeed {
    // ===== 主键 =====
    pub site_id: String,

    // ===== 产能参数 =====
    pub daily_capacity: f64, // 标准班时下的日产能 (件/天)
    #[serde(default = "default_nominal_shift_hours")]
    pub nominal_shift_hours: f64, // 标准班时

    // ===== 爬坡 =====
    pub ramp_preset: String,   // 爬坡曲线预设名
    pub ramp_start: NaiveDate, // 爬坡起始日

    // ===== 提前量 (天) =====
    pub lead_time_input_to_output_days: u32,
    pub lead_time_output_to_shipment_days: u32,

    // ===== CTB 日上限 =====
    // 缺失日期 = 当日无约束
    #[serde(default)]
    pub ctb_limits: BTreeMap<NaiveDate, f64>,
}

impl SiteSeed {
    /// 查询某日 CTB 上限
    pub fn ctb_limit_on(&self, date: NaiveDate) -> Option<f64> {
        self.ctb_limits.get(&date).copied()
    }
}

// ==========================================
// DemandTable - 周需求表
// ==========================================
// 按周标识严格递增排列 (由导入校验保证)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandTable {
    pub entries: Vec<DemandEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandEntry {
    pub week_id: WeekId,
    pub demand: f64,
}

impl DemandTable {
    pub fn new(entries: Vec<DemandEntry>) -> Self {
        Self { entries }
    }

    /// 查询某周需求, 未登记的周视为 0
    pub fn demand_for(&self, week_id: WeekId) -> f64 {
        self.entries
            .binary_search_by(|e| e.week_id.cmp(&week_id))
            .map(|idx| self.entries[idx].demand)
            .unwrap_or(0.0)
    }
}

// ==========================================
// SeedData - 基础数据全集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub sites: Vec<SiteSeed>,
    pub demand: DemandTable,
}

impl SeedData {
    /// 按站点ID查找
    pub fn site(&self, site_id: &str) -> Option<&SiteSeed> {
        self.sites.iter().find(|s| s.site_id == site_id)
    }
}
