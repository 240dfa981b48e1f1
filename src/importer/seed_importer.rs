// ==========================================
// 产量计划仿真与分析系统 - 基础数据导入器
// ==========================================
// 职责: 站点表 / 需求表 / CTB 上限表 → SeedData
// 流程: 文件解析 → 字段映射与类型转换 → 引用校验 → 结构校验
// 红线: 任一行失败即整体失败 (基础数据不做部分导入)
// ==========================================

use crate::domain::seed::{DemandEntry, DemandTable, SeedData, SiteSeed, DEFAULT_NOMINAL_SHIFT_HOURS};
use crate::domain::week::WeekId;
use crate::engine::ramp_curve::RampCurveTable;
use crate::engine::seed_validation::validate_seed_data;
use crate::engine::week_scheme::WeekScheme;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, instrument};

const SITES_FILE: &str = "sites";
const DEMAND_FILE: &str = "demand";
const CTB_FILE: &str = "ctb";

/// 支持的日期格式
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// ==========================================
// SeedImporter - 基础数据导入器
// ==========================================
pub struct SeedImporter {
    ramp_curves: RampCurveTable,
    week_scheme: WeekScheme,
}

impl SeedImporter {
    /// 构造函数
    ///
    /// # 参数
    /// - `ramp_curves`: 用于校验站点爬坡预设名
    /// - `week_scheme`: 用于校验需求周对齐
    pub fn new(ramp_curves: RampCurveTable, week_scheme: WeekScheme) -> Self {
        Self {
            ramp_curves,
            week_scheme,
        }
    }

    /// 加载基础数据
    ///
    /// # 参数
    /// - `sites_path`: 站点表
    /// - `demand_path`: 周需求表
    /// - `ctb_path`: CTB 日上限表 (可选)
    ///
    /// # 返回
    /// - Ok(SeedData): 通过全部校验的基础数据
    /// - Err(ImportError): 首个失败原因
    #[instrument(skip(self, sites_path, demand_path, ctb_path), fields(
        sites = %sites_path.as_ref().display(),
        demand = %demand_path.as_ref().display(),
        with_ctb = ctb_path.is_some()
    ))]
    pub fn load<P: AsRef<Path>>(
        &self,
        sites_path: P,
        demand_path: P,
        ctb_path: Option<P>,
    ) -> ImportResult<SeedData> {
        let parser = UniversalFileParser;

        let mut sites = self.map_sites(&parser.parse(sites_path.as_ref())?)?;
        let demand = self.map_demand(&parser.parse(demand_path.as_ref())?)?;
        let ctb_rows = match ctb_path {
            Some(path) => {
                let records = parser.parse(path.as_ref())?;
                apply_ctb_limits(&mut sites, &records)?
            }
            None => 0,
        };

        let seed = SeedData { sites, demand };
        validate_seed_data(&seed, &self.week_scheme)?;

        info!(
            sites = seed.sites.len(),
            demand_weeks = seed.demand.entries.len(),
            ctb_rows,
            "基础数据导入完成"
        );
        Ok(seed)
    }

    // ==========================================
    // 字段映射
    // ==========================================

    /// 站点表映射
    pub fn map_sites(&self, records: &[RawRecord]) -> ImportResult<Vec<SiteSeed>> {
        records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let row = idx + 2;
                let ramp_preset = required(record, SITES_FILE, row, "ramp_preset")?.to_string();
                if !self.ramp_curves.contains(&ramp_preset) {
                    return Err(ImportError::UnknownRampPreset {
                        file: SITES_FILE.to_string(),
                        row,
                        preset: ramp_preset,
                    });
                }

                let nominal_shift_hours = match optional(record, "nominal_shift_hours") {
                    Some(_) => parse_number(record, SITES_FILE, row, "nominal_shift_hours")?,
                    None => DEFAULT_NOMINAL_SHIFT_HOURS,
                };

                Ok(SiteSeed {
                    site_id: required(record, SITES_FILE, row, "site_id")?.to_string(),
                    daily_capacity: parse_number(record, SITES_FILE, row, "daily_capacity")?,
                    nominal_shift_hours,
                    ramp_preset,
                    ramp_start: parse_date(record, SITES_FILE, row, "ramp_start")?,
                    lead_time_input_to_output_days: parse_number(
                        record,
                        SITES_FILE,
                        row,
                        "lead_time_input_to_output_days",
                    )?,
                    lead_time_output_to_shipment_days: parse_number(
                        record,
                        SITES_FILE,
                        row,
                        "lead_time_output_to_shipment_days",
                    )?,
                    ctb_limits: BTreeMap::new(),
                })
            })
            .collect()
    }

    /// 需求表映射 (保持文件顺序, 单调性由结构校验检查)
    pub fn map_demand(&self, records: &[RawRecord]) -> ImportResult<DemandTable> {
        let entries = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let row = idx + 2;
                Ok(DemandEntry {
                    week_id: WeekId(parse_date(record, DEMAND_FILE, row, "week_id")?),
                    demand: parse_number(record, DEMAND_FILE, row, "demand")?,
                })
            })
            .collect::<ImportResult<Vec<_>>>()?;
        Ok(DemandTable::new(entries))
    }
}

/// 把 CTB 上限行挂到对应站点
///
/// # 返回
/// 成功挂载的行数
pub fn apply_ctb_limits(sites: &mut [SiteSeed], records: &[RawRecord]) -> ImportResult<usize> {
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 2;
        let site_id = required(record, CTB_FILE, row, "site_id")?;
        let date = parse_date(record, CTB_FILE, row, "date")?;
        let limit: f64 = parse_number(record, CTB_FILE, row, "ctb_limit")?;

        let site = sites
            .iter_mut()
            .find(|s| s.site_id == site_id)
            .ok_or_else(|| ImportError::UnknownCtbSite {
                row,
                site_id: site_id.to_string(),
            })?;

        if site.ctb_limits.insert(date, limit).is_some() {
            return Err(ImportError::DuplicateCtbLimit {
                row,
                site_id: site_id.to_string(),
                date: date.to_string(),
            });
        }
    }
    Ok(records.len())
}

// ==========================================
// 字段转换
// ==========================================

fn optional<'a>(record: &'a RawRecord, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
}

fn required<'a>(record: &'a RawRecord, file: &str, row: usize, field: &str) -> ImportResult<&'a str> {
    optional(record, field).ok_or_else(|| ImportError::MissingField {
        file: file.to_string(),
        row,
        field: field.to_string(),
    })
}

fn parse_number<T: FromStr>(record: &RawRecord, file: &str, row: usize, field: &str) -> ImportResult<T>
where
    T::Err: std::fmt::Display,
{
    let raw = required(record, file, row, field)?;
    raw.parse::<T>().map_err(|e| ImportError::InvalidValue {
        file: file.to_string(),
        row,
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

fn parse_date(record: &RawRecord, file: &str, row: usize, field: &str) -> ImportResult<NaiveDate> {
    let raw = required(record, file, row, field)?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ImportError::InvalidValue {
            file: file.to_string(),
            row,
            field: field.to_string(),
            value: raw.to_string(),
            message: "期望 YYYY-MM-DD".to_string(),
        })
}

impl Default for SeedImporter {
    fn default() -> Self {
        Self::new(RampCurveTable::builtin(), WeekScheme::default())
    }
}
