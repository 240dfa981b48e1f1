// ==========================================
// 产量计划仿真与分析系统 - 命令行入口
// ==========================================
// 用法:
//   production-plan-aps --sites sites.csv --demand demand.csv [--ctb ctb.csv]
//       --start 2025-01-05 --end 2025-02-04 [--mode combined] [--site S1]...
//       [--ramp-curve standard] [--ot] [--shift-hours 10] [--working-days 7]
//       [--config-db path]
// 输出: stdout 打印 {plan, analysis} JSON, 日志写 stderr
// ==========================================

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use production_plan_aps::config::ConfigManager;
use production_plan_aps::db::default_config_db_path;
use production_plan_aps::domain::{PlanConfig, PlanMode};
use production_plan_aps::importer::SeedImporter;
use production_plan_aps::{logging, PlanApi};
use std::path::PathBuf;

/// 命令行参数
#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    sites: PathBuf,
    demand: PathBuf,
    ctb: Option<PathBuf>,
    start: NaiveDate,
    end: NaiveDate,
    mode: PlanMode,
    site_ids: Vec<String>,
    ramp_curve: Option<String>,
    ot_enabled: bool,
    shift_hours: f64,
    working_days: u8,
    config_db: Option<PathBuf>,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut sites = None;
        let mut demand = None;
        let mut ctb = None;
        let mut start = None;
        let mut end = None;
        let mut mode = PlanMode::Combined;
        let mut site_ids = Vec::new();
        let mut ramp_curve = None;
        let mut ot_enabled = false;
        let mut shift_hours = 10.0;
        let mut working_days = 7;
        let mut config_db = None;

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            if flag == "--ot" {
                ot_enabled = true;
                continue;
            }

            let value = args
                .next()
                .ok_or_else(|| anyhow!("参数 {} 缺少取值", flag))?;
            match flag.as_str() {
                "--sites" => sites = Some(PathBuf::from(value)),
                "--demand" => demand = Some(PathBuf::from(value)),
                "--ctb" => ctb = Some(PathBuf::from(value)),
                "--start" => start = Some(parse_date(&flag, &value)?),
                "--end" => end = Some(parse_date(&flag, &value)?),
                "--mode" => {
                    mode = PlanMode::parse(&value)
                        .ok_or_else(|| anyhow!("未知计划模式: {}", value))?
                }
                "--site" => site_ids.push(value),
                "--ramp-curve" => ramp_curve = Some(value),
                "--shift-hours" => {
                    shift_hours = value
                        .parse()
                        .with_context(|| format!("班时无效: {}", value))?
                }
                "--working-days" => {
                    working_days = value
                        .parse()
                        .with_context(|| format!("每周工作天数无效: {}", value))?
                }
                "--config-db" => config_db = Some(PathBuf::from(value)),
                other => bail!("未知参数: {}", other),
            }
        }

        Ok(Self {
            sites: sites.ok_or_else(|| anyhow!("缺少 --sites"))?,
            demand: demand.ok_or_else(|| anyhow!("缺少 --demand"))?,
            ctb,
            start: start.ok_or_else(|| anyhow!("缺少 --start"))?,
            end: end.ok_or_else(|| anyhow!("缺少 --end"))?,
            mode,
            site_ids,
            ramp_curve,
            ot_enabled,
            shift_hours,
            working_days,
            config_db,
        })
    }
}

fn parse_date(flag: &str, value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{} 日期格式错误 (期望 YYYY-MM-DD): {}", flag, value))
}

fn run(args: CliArgs) -> anyhow::Result<String> {
    // 1. 配置库
    let db_path = args.config_db.clone().unwrap_or_else(default_config_db_path);
    let db_path = db_path.to_string_lossy().to_string();
    tracing::info!(config_db = %db_path, "加载配置库");
    let config_manager = ConfigManager::new(&db_path).map_err(|e| anyhow!("配置库打开失败: {}", e))?;

    let ramp_curves = config_manager
        .get_ramp_curve_table()
        .map_err(|e| anyhow!("爬坡曲线配置读取失败: {}", e))?;
    let params = config_manager
        .get_simulation_params()
        .map_err(|e| anyhow!("仿真参数读取失败: {}", e))?;

    // 2. 基础数据
    let importer = SeedImporter::new(ramp_curves, params.week_scheme);
    let seed = importer.load(&args.sites, &args.demand, args.ctb.as_ref())?;

    // 3. 计划配置 (未指定站点时使用全部站点)
    let site_ids: Vec<&str> = if args.site_ids.is_empty() {
        seed.sites.iter().map(|s| s.site_id.as_str()).collect()
    } else {
        args.site_ids.iter().map(|s| s.as_str()).collect()
    };
    let mut config = PlanConfig::new(args.start, args.end, args.mode, &site_ids);
    config.ramp_curve = args.ramp_curve.clone();
    config.ot_enabled = args.ot_enabled;
    config.shift_hours = args.shift_hours;
    config.working_days_per_week = args.working_days;

    // 4. 仿真 + 分析
    let api = PlanApi::from_config(&config_manager)?;
    let run = api.run(&config, &seed)?;

    let output = serde_json::json!({
        "plan": run.plan,
        "analysis": run.analysis,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> anyhow::Result<()> {
    logging::init();
    tracing::info!(version = production_plan_aps::VERSION, "产量计划仿真与分析系统");

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let output = run(args)?;
    println!("{}", output);
    Ok(())
}
