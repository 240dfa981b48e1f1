// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 配置库覆写 → 引擎参数 → 仿真/分析行为
// ==========================================

mod helpers;

use chrono::{Duration, Weekday};
use helpers::*;
use production_plan_aps::config::{config_keys, ConfigManager};
use production_plan_aps::domain::types::{PlanMode, RampHealth};
use production_plan_aps::domain::PlanConfig;
use production_plan_aps::engine::RampCurvePreset;
use production_plan_aps::PlanApi;
use tempfile::tempdir;

fn temp_manager() -> (tempfile::TempDir, ConfigManager) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.db");
    let manager = ConfigManager::new(path.to_str().unwrap()).unwrap();
    (dir, manager)
}

#[test]
fn test_defaults_without_overrides() {
    let (_dir, manager) = temp_manager();

    let params = manager.get_simulation_params().unwrap();
    assert_eq!(params.overtime_multiplier, 1.15);
    assert_eq!(params.week_scheme.start_day, Weekday::Sun);

    let thresholds = manager.get_analysis_thresholds().unwrap();
    assert_eq!(thresholds.gap_critical_attainment, 80.0);
    assert_eq!(thresholds.ramp_window_days, 7);

    let table = manager.get_ramp_curve_table().unwrap();
    for name in ["flat", "fast", "standard", "slow"] {
        assert!(table.contains(name));
    }
}

#[test]
fn test_overrides_persist_across_connections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.db");
    let path = path.to_str().unwrap();

    {
        let manager = ConfigManager::new(path).unwrap();
        manager
            .set_config_value(config_keys::OVERTIME_MULTIPLIER, "1.3")
            .unwrap();
        manager
            .set_config_value(config_keys::WEEK_START_DAY, "mon")
            .unwrap();
        manager
            .set_config_value(config_keys::SPIKE_PERCENT, "45")
            .unwrap();
    }

    let manager = ConfigManager::new(path).unwrap();
    let params = manager.get_simulation_params().unwrap();
    assert_eq!(params.overtime_multiplier, 1.3);
    assert_eq!(params.week_scheme.start_day, Weekday::Mon);
    assert_eq!(manager.get_analysis_thresholds().unwrap().spike_percent, 45.0);
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let (_dir, manager) = temp_manager();
    manager
        .set_config_value(config_keys::OVERTIME_MULTIPLIER, "fast")
        .unwrap();
    manager
        .set_config_value(config_keys::WEEK_START_DAY, "someday")
        .unwrap();
    manager
        .set_config_value(config_keys::RAMP_CURVE_PRESETS, "{not json")
        .unwrap();

    let params = manager.get_simulation_params().unwrap();
    assert_eq!(params.overtime_multiplier, 1.15);
    assert_eq!(params.week_scheme.start_day, Weekday::Sun);
    assert_eq!(
        manager.get_ramp_curve_table().unwrap().preset_names().len(),
        4
    );
}

#[test]
fn test_snapshot_and_restore() {
    let (_dir, manager) = temp_manager();
    manager
        .set_config_value(config_keys::CTB_CRITICAL_PERCENT, "25")
        .unwrap();
    let snapshot = manager.get_config_snapshot().unwrap();

    manager
        .set_config_value(config_keys::CTB_CRITICAL_PERCENT, "60")
        .unwrap();
    assert_eq!(
        manager.get_analysis_thresholds().unwrap().ctb_critical_percent,
        60.0
    );

    let restored = manager.restore_config_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 1);
    assert_eq!(
        manager.get_analysis_thresholds().unwrap().ctb_critical_percent,
        25.0
    );
}

#[test]
fn test_custom_ramp_preset_drives_simulation() {
    let (_dir, manager) = temp_manager();
    // 7 天内 0.2 → 1.0
    let preset = RampCurvePreset::new("pilot", vec![(0, 0.2), (7, 1.0)]).unwrap();
    manager.save_ramp_curve_preset(&preset).unwrap();

    let start = base_day();
    let seed = SeedBuilder::new()
        .site(SiteBuilder::new("S1").capacity(100.0).ramp("pilot", start).build())
        .build();
    let config = PlanConfig::new(start, start + Duration::days(13), PlanMode::Constrained, &["S1"]);

    let api = PlanApi::from_config(&manager).unwrap();
    let run = api.run(&config, &seed).unwrap();
    let plan = run.plan.primary();

    assert!((plan.program_results[0].input_final - 20.0).abs() < 1e-9);
    assert!((plan.program_results[7].input_final - 100.0).abs() < 1e-9);
    assert!((plan.program_results[0].ramp_utilization - 0.2).abs() < 1e-9);
    // 首窗口 380, 末窗口 700
    let ramp = &run.analysis.ramp_analysis;
    assert!((ramp.first_window_output - 380.0).abs() < 1e-6);
    assert!((ramp.ramp_ratio.unwrap() - 700.0 / 380.0).abs() < 1e-9);
    assert_eq!(ramp.ramp_health, RampHealth::Healthy);
}

#[test]
fn test_threshold_override_changes_analysis() {
    let (_dir, manager) = temp_manager();
    // 把突变阈值放宽到 60%, 40% 跳升不再是突变
    manager.set_config_value(config_keys::SPIKE_PERCENT, "60").unwrap();

    let start = base_day();
    let seed = SeedBuilder::new()
        .site(SiteBuilder::new("S1").capacity(100.0).ctb(start + Duration::days(3), 60.0).build())
        .build();
    let config = PlanConfig::new(start, start + Duration::days(9), PlanMode::Constrained, &["S1"]);

    let default_run = PlanApi::default().run(&config, &seed).unwrap();
    assert!(!default_run.analysis.stability_analysis.spikes.is_empty());

    let tuned_run = PlanApi::from_config(&manager).unwrap().run(&config, &seed).unwrap();
    // 100 → 60 (-40%) 与 60 → 100 (+66.7%)
    assert_eq!(tuned_run.analysis.stability_analysis.spikes.len(), 1);
}
