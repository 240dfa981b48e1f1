// ==========================================
// 产量计划仿真与分析系统 - 计划仿真引擎
// ==========================================
// 职责: 按站点、按日推演投入/产出/出货, 生成跨站点汇总与周指标
// 输入: 日期区间 + 计划模式 + 基础数据 + 计划配置
// 输出: PlanOutcome (单模式 PlanResult 或 组合模式双结果)
// 红线: 纯函数, 不持有状态, 不修改输入
// ==========================================

use crate::config::engine_params::SimulationParams;
use crate::domain::plan::{
    CombinedPlanResult, DayRecord, PlanConfig, PlanOutcome, PlanResult, PlanSummary,
    ProgramResult, WeekMetric,
};
use crate::domain::seed::{DemandTable, SeedData, SiteSeed};
use crate::domain::types::PlanMode;
use crate::domain::week::WeekId;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ramp_curve::RampCurveTable;
use crate::engine::seed_validation::validate_seed_data;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

// ==========================================
// SimulationEngine - 计划仿真引擎
// ==========================================
pub struct SimulationEngine {
    ramp_curves: RampCurveTable,
    params: SimulationParams,
}

impl SimulationEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `ramp_curves`: 只读爬坡曲线预设表
    /// - `params`: 仿真参数 (加班倍数、周口径)
    pub fn new(ramp_curves: RampCurveTable, params: SimulationParams) -> Self {
        Self {
            ramp_curves,
            params,
        }
    }

    pub fn ramp_curves(&self) -> &RampCurveTable {
        &self.ramp_curves
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成计划
    ///
    /// 规则:
    /// 1) start > end → InvalidRange
    /// 2) start / end / mode 必须与 config 记录的区间与模式一致
    /// 3) 站点集合非空且全部存在于基础数据, 基础数据整体通过结构校验
    /// 4) constrained / combined 应用 CTB 日上限, unconstrained 不封顶
    /// 5) combined 运行两次 (封顶 + 不封顶), 其余参数完全一致
    ///
    /// # 参数
    /// - `start` / `end`: 日期区间 (闭区间)
    /// - `mode`: 计划模式
    /// - `seed`: 基础数据
    /// - `config`: 计划配置
    ///
    /// # 返回
    /// - Ok(PlanOutcome): 仿真结果
    /// - Err(EngineError): 区间/配置错误
    #[instrument(skip(self, seed, config), fields(
        %start,
        %end,
        %mode,
        sites_count = config.sites.len()
    ))]
    pub fn generate_plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        mode: PlanMode,
        seed: &SeedData,
        config: &PlanConfig,
    ) -> EngineResult<PlanOutcome> {
        // 1. 请求校验
        let sites = self.validate_request(start, end, mode, seed, config)?;
        let dates = date_sequence(start, end);

        // 2. 按模式运行
        let outcome = match mode {
            PlanMode::Combined => {
                let constrained =
                    self.run_single(&dates, PlanMode::Constrained, &sites, &seed.demand, config)?;
                let unconstrained = self.run_single(
                    &dates,
                    PlanMode::Unconstrained,
                    &sites,
                    &seed.demand,
                    config,
                )?;
                PlanOutcome::Combined(CombinedPlanResult {
                    mode: PlanMode::Combined,
                    constrained,
                    unconstrained,
                })
            }
            single => PlanOutcome::Single(self.run_single(
                &dates,
                single,
                &sites,
                &seed.demand,
                config,
            )?),
        };

        info!(
            days = dates.len(),
            total_output = outcome.primary().summary.total_output,
            weeks_with_gap = outcome.primary().summary.weeks_with_gap.len(),
            "计划仿真完成"
        );

        Ok(outcome)
    }

    // ==========================================
    // 请求校验
    // ==========================================

    /// 校验区间、站点选择、爬坡预设与计划配置
    ///
    /// # 返回
    /// 按站点ID排序的已选站点
    fn validate_request<'a>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        mode: PlanMode,
        seed: &'a SeedData,
        config: &PlanConfig,
    ) -> EngineResult<Vec<&'a SiteSeed>> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }

        // 结果中记录的计划配置必须与实际仿真参数一致
        if start != config.date_range.start || end != config.date_range.end {
            return Err(EngineError::InvalidConfiguration(format!(
                "仿真区间 {}~{} 与计划配置区间 {}~{} 不一致",
                start, end, config.date_range.start, config.date_range.end
            )));
        }
        if mode != config.mode {
            return Err(EngineError::InvalidConfiguration(format!(
                "仿真模式 {} 与计划配置模式 {} 不一致",
                mode, config.mode
            )));
        }

        if config.sites.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "站点集合不能为空".to_string(),
            ));
        }
        if !config.shift_hours.is_finite() || config.shift_hours <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "班时无效: {}",
                config.shift_hours
            )));
        }
        if !(1..=7).contains(&config.working_days_per_week) {
            return Err(EngineError::InvalidConfiguration(format!(
                "每周工作天数无效: {}",
                config.working_days_per_week
            )));
        }
        if !self.params.overtime_multiplier.is_finite() || self.params.overtime_multiplier <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "加班倍数无效: {}",
                self.params.overtime_multiplier
            )));
        }

        let mut sites = Vec::with_capacity(config.sites.len());
        for site_id in &config.sites {
            let site = seed.site(site_id).ok_or_else(|| EngineError::UnknownSite {
                site_id: site_id.clone(),
            })?;
            // 预设存在性在运行前统一检查, 避免半途失败
            self.ramp_curves.preset(effective_preset(site, config))?;
            sites.push(site);
        }

        // 站点唯一 / 站点数值 / 需求表
        validate_seed_data(seed, &self.params.week_scheme)?;

        Ok(sites)
    }

    // ==========================================
    // 单次运行
    // ==========================================

    fn run_single(
        &self,
        dates: &[NaiveDate],
        mode: PlanMode,
        sites: &[&SiteSeed],
        demand: &DemandTable,
        config: &PlanConfig,
    ) -> EngineResult<PlanResult> {
        let apply_caps = mode.applies_caps();

        let mut site_results = BTreeMap::new();
        for site in sites {
            let records = self.simulate_site(site, dates, apply_caps, config)?;
            debug!(
                site_id = %site.site_id,
                %mode,
                cum_output = records.last().map(|r| r.cum_output).unwrap_or(0.0),
                "站点仿真完成"
            );
            site_results.insert(site.site_id.clone(), records);
        }

        let program_results = aggregate_program(dates, &site_results);
        let weekly_metrics = self.build_weekly_metrics(&program_results, demand);
        let summary = build_summary(&program_results, &weekly_metrics);

        Ok(PlanResult {
            mode,
            program_results,
            site_results,
            weekly_metrics,
            summary,
        })
    }

    /// 单站点逐日推演
    ///
    /// 公式:
    /// - input_unconstrained = 日产能 × (班时/标准班时) × 爬坡利用率 × (加班 ? 倍数 : 1), 非工作日为 0
    /// - input_final = min(input_unconstrained, ctb) (封顶且当日有上限时)
    /// - output_final[d] = input_final[d - L_io], shipment_final[d] = output_final[d - L_os]
    fn simulate_site(
        &self,
        site: &SiteSeed,
        dates: &[NaiveDate],
        apply_caps: bool,
        config: &PlanConfig,
    ) -> EngineResult<Vec<DayRecord>> {
        let preset = self.ramp_curves.preset(effective_preset(site, config))?;
        let shift_factor = config.shift_hours / site.nominal_shift_hours;
        let ot_factor = if config.ot_enabled {
            self.params.overtime_multiplier
        } else {
            1.0
        };
        let lead_io = site.lead_time_input_to_output_days as usize;
        let lead_os = site.lead_time_output_to_shipment_days as usize;

        // 1. 投入
        let mut utilizations = Vec::with_capacity(dates.len());
        let mut inputs_unconstrained = Vec::with_capacity(dates.len());
        let mut ctbs = Vec::with_capacity(dates.len());
        let mut inputs_final = Vec::with_capacity(dates.len());

        for &date in dates {
            let utilization = preset.fraction_at((date - site.ramp_start).num_days());
            let input_unconstrained = if is_working_day(date, config) {
                site.daily_capacity * shift_factor * utilization * ot_factor
            } else {
                0.0
            };
            let ctb_daily = site.ctb_limit_on(date);
            let input_final = match ctb_daily {
                Some(cap) if apply_caps => input_unconstrained.min(cap),
                _ => input_unconstrained,
            };

            utilizations.push(utilization);
            inputs_unconstrained.push(input_unconstrained);
            ctbs.push(ctb_daily);
            inputs_final.push(input_final);
        }

        // 2. 产出/出货滞后 (区间起始前贡献 0)
        let outputs = lag(&inputs_final, lead_io);
        let shipments = lag(&outputs, lead_os);

        // 3. 累计
        let mut records = Vec::with_capacity(dates.len());
        let (mut cum_input, mut cum_output, mut cum_shipment) = (0.0, 0.0, 0.0);
        for (idx, &date) in dates.iter().enumerate() {
            cum_input += inputs_final[idx];
            cum_output += outputs[idx];
            cum_shipment += shipments[idx];
            records.push(DayRecord {
                date,
                ramp_utilization: utilizations[idx],
                input_unconstrained: inputs_unconstrained[idx],
                ctb_daily: ctbs[idx],
                input_final: inputs_final[idx],
                output_final: outputs[idx],
                shipment_final: shipments[idx],
                cum_input,
                cum_output,
                cum_shipment,
            });
        }

        Ok(records)
    }

    // ==========================================
    // 周汇总
    // ==========================================

    /// 按周口径汇总 (部分覆盖的边界周按实际天数汇总, 需求取整周需求)
    fn build_weekly_metrics(
        &self,
        program_results: &[ProgramResult],
        demand: &DemandTable,
    ) -> Vec<WeekMetric> {
        let scheme = &self.params.week_scheme;
        let mut metrics: Vec<WeekMetric> = Vec::new();
        let mut current: Option<(WeekId, f64, f64, f64)> = None;

        for day in program_results {
            let week_id = scheme.week_id(day.date);
            match current.as_mut() {
                Some((id, input, output, shipments)) if *id == week_id => {
                    *input += day.input_final;
                    *output += day.output_final;
                    *shipments += day.shipment_final;
                }
                _ => {
                    if let Some((id, input, output, shipments)) = current.take() {
                        metrics.push(WeekMetric::new(id, input, output, shipments, demand.demand_for(id)));
                    }
                    current = Some((week_id, day.input_final, day.output_final, day.shipment_final));
                }
            }
        }
        if let Some((id, input, output, shipments)) = current {
            metrics.push(WeekMetric::new(id, input, output, shipments, demand.demand_for(id)));
        }

        metrics
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(RampCurveTable::builtin(), SimulationParams::default())
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 站点实际使用的爬坡预设 (计划配置优先)
fn effective_preset<'a>(site: &'a SiteSeed, config: &'a PlanConfig) -> &'a str {
    config
        .ramp_curve
        .as_deref()
        .unwrap_or(site.ramp_preset.as_str())
}

/// 工作日判断
///
/// 每周工作 n 天时, 周一起算的后 7-n 天休息; 开启加班时周日上班
fn is_working_day(date: NaiveDate, config: &PlanConfig) -> bool {
    if config.ot_enabled && date.weekday() == Weekday::Sun {
        return true;
    }
    date.weekday().number_from_monday() <= config.working_days_per_week as u32
}

/// 闭区间日期序列
fn date_sequence(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// 序列整体滞后 `days` 天, 前段补 0
fn lag(values: &[f64], days: usize) -> Vec<f64> {
    (0..values.len())
        .map(|idx| if idx >= days { values[idx - days] } else { 0.0 })
        .collect()
}

/// 跨站点按日汇总
fn aggregate_program(
    dates: &[NaiveDate],
    site_results: &BTreeMap<String, Vec<DayRecord>>,
) -> Vec<ProgramResult> {
    let mut program = Vec::with_capacity(dates.len());
    let (mut cum_input, mut cum_output, mut cum_shipment) = (0.0, 0.0, 0.0);

    for (idx, &date) in dates.iter().enumerate() {
        let days: Vec<&DayRecord> = site_results.values().map(|records| &records[idx]).collect();

        let input_final: f64 = days.iter().map(|d| d.input_final).sum();
        let output_final: f64 = days.iter().map(|d| d.output_final).sum();
        let shipment_final: f64 = days.iter().map(|d| d.shipment_final).sum();
        let ctb_daily = days
            .iter()
            .map(|d| d.ctb_daily)
            .sum::<Option<f64>>();
        let ramp_utilization = days
            .iter()
            .map(|d| d.ramp_utilization)
            .fold(f64::INFINITY, f64::min);

        cum_input += input_final;
        cum_output += output_final;
        cum_shipment += shipment_final;

        program.push(ProgramResult {
            date,
            ramp_utilization: if ramp_utilization.is_finite() { ramp_utilization } else { 0.0 },
            input_unconstrained: days.iter().map(|d| d.input_unconstrained).sum(),
            ctb_daily,
            input_final,
            output_final,
            shipment_final,
            cum_input,
            cum_output,
            cum_shipment,
        });
    }

    program
}

/// 计划汇总
fn build_summary(program_results: &[ProgramResult], weekly_metrics: &[WeekMetric]) -> PlanSummary {
    let total_output = program_results.iter().map(|d| d.output_final).sum();
    let total_shipment = program_results.iter().map(|d| d.shipment_final).sum();

    let total_demand: f64 = weekly_metrics.iter().map(|w| w.demand).sum();
    let total_weekly_shipments: f64 = weekly_metrics.iter().map(|w| w.shipments).sum();
    let overall_attainment = if total_demand > 0.0 {
        total_weekly_shipments / total_demand * 100.0
    } else {
        100.0
    };

    let weeks_with_gap: BTreeSet<_> = weekly_metrics
        .iter()
        .filter(|w| w.gap < 0.0)
        .map(|w| w.week_id)
        .collect();

    PlanSummary {
        total_output,
        total_shipment,
        overall_attainment,
        weeks_with_gap,
    }
}
