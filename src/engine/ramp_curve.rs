// ==========================================
// 产量计划仿真与分析系统 - 爬坡曲线模型
// ==========================================
// 职责: 爬坡起始后经过天数 → 产能利用率 [0,1]
// 输入: 预设名 + 经过天数
// 输出: 利用率 (分段线性插值, 达到爬坡长度后恒为 1.0)
// 红线: 预设表通过构造参数注入, 不使用进程级缓存
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 内置预设名
// ==========================================
pub const PRESET_FLAT: &str = "flat";
pub const PRESET_FAST: &str = "fast";
pub const PRESET_STANDARD: &str = "standard";
pub const PRESET_SLOW: &str = "slow";

/// 曲线控制点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampPoint {
    pub day: u32,
    pub fraction: f64,
}

// ==========================================
// RampCurvePreset - 爬坡曲线预设
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampCurvePreset {
    pub name: String,
    pub points: Vec<RampPoint>,
}

impl RampCurvePreset {
    /// 构造并校验预设
    ///
    /// 规则:
    /// 1) 控制点非空, 第一个点 day = 0
    /// 2) day 严格递增
    /// 3) fraction ∈ [0,1] 且单调不减
    /// 4) 最后一个点 fraction = 1.0
    pub fn new(name: &str, points: Vec<(u32, f64)>) -> EngineResult<Self> {
        let invalid = |reason: &str| {
            EngineError::InvalidConfiguration(format!("爬坡曲线 {} 无效: {}", name, reason))
        };

        if name.trim().is_empty() {
            return Err(invalid("预设名为空"));
        }
        let Some(first) = points.first() else {
            return Err(invalid("控制点为空"));
        };
        if first.0 != 0 {
            return Err(invalid("第一个控制点必须从第 0 天开始"));
        }

        for (idx, &(_, fraction)) in points.iter().enumerate() {
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(invalid("利用率必须在 [0,1] 内"));
            }
            if idx > 0 {
                let (prev_day, prev_fraction) = points[idx - 1];
                if points[idx].0 <= prev_day {
                    return Err(invalid("控制点天数必须严格递增"));
                }
                if fraction < prev_fraction {
                    return Err(invalid("利用率必须单调不减"));
                }
            }
        }

        if let Some(&(_, last)) = points.last() {
            if (last - 1.0).abs() > f64::EPSILON {
                return Err(invalid("最后一个控制点利用率必须为 1.0"));
            }
        }

        Ok(Self {
            name: name.trim().to_string(),
            points: points
                .into_iter()
                .map(|(day, fraction)| RampPoint { day, fraction })
                .collect(),
        })
    }

    /// 爬坡长度 (达到 1.0 的天数)
    pub fn ramp_length_days(&self) -> u32 {
        self.points.last().map(|p| p.day).unwrap_or(0)
    }

    /// 经过天数 → 利用率
    pub fn fraction_at(&self, elapsed_days: i64) -> f64 {
        if elapsed_days < 0 {
            return 0.0;
        }
        let day = elapsed_days as f64;

        for window in self.points.windows(2) {
            let (a, b) = (window[0], window[1]);
            if day < b.day as f64 {
                let span = (b.day - a.day) as f64;
                let t = (day - a.day as f64) / span;
                return a.fraction + (b.fraction - a.fraction) * t;
            }
        }

        // 超过最后一个控制点: 爬坡完成
        1.0
    }
}

// ==========================================
// RampCurveTable - 只读预设表
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RampCurveTable {
    presets: BTreeMap<String, RampCurvePreset>,
}

impl RampCurveTable {
    /// 空表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 内置预设表
    pub fn builtin() -> Self {
        let builtin = [
            (PRESET_FLAT, vec![(0, 1.0)]),
            (PRESET_FAST, vec![(0, 0.5), (14, 1.0)]),
            (PRESET_STANDARD, vec![(0, 0.3), (14, 0.6), (28, 0.85), (42, 1.0)]),
            (PRESET_SLOW, vec![(0, 0.2), (28, 0.5), (56, 0.8), (84, 1.0)]),
        ];

        let mut table = Self::empty();
        for (name, points) in builtin {
            if let Ok(preset) = RampCurvePreset::new(name, points) {
                table.presets.insert(preset.name.clone(), preset);
            }
        }
        table
    }

    /// 添加或替换预设 (返回新表, 原表不变)
    pub fn with_preset(mut self, preset: RampCurvePreset) -> Self {
        self.presets.insert(preset.name.clone(), preset);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn preset(&self, name: &str) -> EngineResult<&RampCurvePreset> {
        self.presets
            .get(name)
            .ok_or_else(|| EngineError::UnknownRampPreset {
                name: name.to_string(),
            })
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.keys().map(|k| k.as_str()).collect()
    }

    /// 产能利用率
    ///
    /// # 参数
    /// - `preset_name`: 预设名
    /// - `elapsed_days`: 距爬坡起始日的天数 (可为负)
    ///
    /// # 返回
    /// - Ok(f64): [0,1] 内的利用率, elapsed < 0 时为 0
    /// - Err(UnknownRampPreset): 预设不存在
    pub fn utilization_fraction(&self, preset_name: &str, elapsed_days: i64) -> EngineResult<f64> {
        Ok(self.preset(preset_name)?.fraction_at(elapsed_days))
    }
}
