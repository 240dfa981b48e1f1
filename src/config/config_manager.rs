// ==========================================
// 产量计划仿真与分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 配置值格式错误时回退默认值并告警, 不中断仿真
// ==========================================

use crate::config::engine_params::{AnalysisThresholds, SimulationParams};
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::engine::ramp_curve::{RampCurvePreset, RampCurveTable};
use crate::engine::week_scheme::WeekScheme;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 默认配置作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例 (自动建表)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_schema()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 对传入连接再次应用统一 PRAGMA (幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_schema()?;
        Ok(manager)
    }

    fn ensure_schema(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    // ==========================================
    // 基础读写
    // ==========================================

    /// 从 config_kv 表读取配置值 (scope_id='global')
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取并解析配置值, 缺失或格式错误时返回默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(config_key = key, raw_value = %raw, "配置值格式错误, 使用默认值");
                Ok(default)
            }
        }
    }

    // ==========================================
    // 快照
    // ==========================================

    /// 获取所有配置的快照 (JSON格式)
    ///
    /// # 用途
    /// - 计划对比时记录两次仿真所用参数
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖现有 global 配置, 快照外的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 仿真参数
    pub fn get_simulation_params(&self) -> Result<SimulationParams, Box<dyn Error>> {
        let defaults = SimulationParams::default();

        let overtime_multiplier =
            self.get_parsed_or(config_keys::OVERTIME_MULTIPLIER, defaults.overtime_multiplier)?;

        let week_scheme = match self.get_config_value(config_keys::WEEK_START_DAY)? {
            Some(raw) => WeekScheme::parse(&raw).unwrap_or_else(|| {
                warn!(
                    config_key = config_keys::WEEK_START_DAY,
                    raw_value = %raw,
                    "周起始日配置格式错误, 使用周日"
                );
                defaults.week_scheme
            }),
            None => defaults.week_scheme,
        };

        Ok(SimulationParams {
            overtime_multiplier,
            week_scheme,
        })
    }

    /// 分析阈值
    pub fn get_analysis_thresholds(&self) -> Result<AnalysisThresholds, Box<dyn Error>> {
        let d = AnalysisThresholds::default();

        Ok(AnalysisThresholds {
            gap_critical_attainment: self
                .get_parsed_or(config_keys::GAP_CRITICAL_ATTAINMENT, d.gap_critical_attainment)?,
            gap_warning_attainment: self
                .get_parsed_or(config_keys::GAP_WARNING_ATTAINMENT, d.gap_warning_attainment)?,
            ctb_critical_percent: self
                .get_parsed_or(config_keys::CTB_CRITICAL_PERCENT, d.ctb_critical_percent)?,
            ctb_warning_percent: self
                .get_parsed_or(config_keys::CTB_WARNING_PERCENT, d.ctb_warning_percent)?,
            ctb_recommend_percent: self
                .get_parsed_or(config_keys::CTB_RECOMMEND_PERCENT, d.ctb_recommend_percent)?,
            spike_percent: self.get_parsed_or(config_keys::SPIKE_PERCENT, d.spike_percent)?,
            spike_warning_percent: self
                .get_parsed_or(config_keys::SPIKE_WARNING_PERCENT, d.spike_warning_percent)?,
            ramp_window_days: self.get_parsed_or(config_keys::RAMP_WINDOW_DAYS, d.ramp_window_days)?,
            ramp_slow_ratio: self.get_parsed_or(config_keys::RAMP_SLOW_RATIO, d.ramp_slow_ratio)?,
            ramp_aggressive_ratio: self
                .get_parsed_or(config_keys::RAMP_AGGRESSIVE_RATIO, d.ramp_aggressive_ratio)?,
            ramp_slow_min_days: self
                .get_parsed_or(config_keys::RAMP_SLOW_MIN_DAYS, d.ramp_slow_min_days)?,
        })
    }

    /// 爬坡曲线预设表 (内置预设 + 配置覆写)
    ///
    /// # 说明
    /// 配置格式为 JSON: {"预设名": [[天数, 利用率], ...]}
    /// 单个预设校验失败时跳过该预设并告警, 其余预设照常生效
    pub fn get_ramp_curve_table(&self) -> Result<RampCurveTable, Box<dyn Error>> {
        let mut table = RampCurveTable::builtin();

        let Some(raw) = self.get_config_value(config_keys::RAMP_CURVE_PRESETS)? else {
            return Ok(table);
        };

        let presets: BTreeMap<String, Vec<(u32, f64)>> = match serde_json::from_str(&raw) {
            Ok(presets) => presets,
            Err(e) => {
                warn!(
                    config_key = config_keys::RAMP_CURVE_PRESETS,
                    error = %e,
                    "爬坡曲线配置格式错误, 仅使用内置预设"
                );
                return Ok(table);
            }
        };

        for (name, points) in presets {
            match RampCurvePreset::new(&name, points) {
                Ok(preset) => table = table.with_preset(preset),
                Err(e) => warn!(preset = %name, error = %e, "跳过无效爬坡曲线预设"),
            }
        }

        Ok(table)
    }

    /// 保存自定义爬坡曲线预设 (与已保存的自定义预设合并)
    ///
    /// # 注意
    /// - 已保存的预设 JSON 损坏时返回错误且不覆写, 需先人工修复或清除该键
    pub fn save_ramp_curve_preset(&self, preset: &RampCurvePreset) -> Result<(), Box<dyn Error>> {
        let mut presets: BTreeMap<String, Vec<(u32, f64)>> =
            match self.get_config_value(config_keys::RAMP_CURVE_PRESETS)? {
                Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                    warn!(
                        config_key = config_keys::RAMP_CURVE_PRESETS,
                        error = %e,
                        "已保存的爬坡曲线配置格式错误, 拒绝覆写"
                    );
                    format!("爬坡曲线配置格式错误, 未保存预设 {}: {}", preset.name, e)
                })?,
                None => BTreeMap::new(),
            };

        presets.insert(
            preset.name.clone(),
            preset.points.iter().map(|p| (p.day, p.fraction)).collect(),
        );

        self.set_config_value(config_keys::RAMP_CURVE_PRESETS, &serde_json::to_string(&presets)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 仿真
    pub const OVERTIME_MULTIPLIER: &str = "overtime_multiplier";
    pub const WEEK_START_DAY: &str = "week_start_day"; // sun / mon / ...
    pub const RAMP_CURVE_PRESETS: &str = "ramp_curve_presets"; // 自定义爬坡曲线 (JSON)

    // 缺口分析
    pub const GAP_CRITICAL_ATTAINMENT: &str = "gap_critical_attainment";
    pub const GAP_WARNING_ATTAINMENT: &str = "gap_warning_attainment";

    // CTB 约束分析
    pub const CTB_CRITICAL_PERCENT: &str = "ctb_critical_percent";
    pub const CTB_WARNING_PERCENT: &str = "ctb_warning_percent";
    pub const CTB_RECOMMEND_PERCENT: &str = "ctb_recommend_percent";

    // 稳定性分析
    pub const SPIKE_PERCENT: &str = "spike_percent";
    pub const SPIKE_WARNING_PERCENT: &str = "spike_warning_percent";

    // 爬坡分析
    pub const RAMP_WINDOW_DAYS: &str = "ramp_window_days";
    pub const RAMP_SLOW_RATIO: &str = "ramp_slow_ratio";
    pub const RAMP_AGGRESSIVE_RATIO: &str = "ramp_aggressive_ratio";
    pub const RAMP_SLOW_MIN_DAYS: &str = "ramp_slow_min_days";
}
