// ==========================================
// 产量计划仿真与分析系统 - 引擎层错误类型
// ==========================================
// 职责: 仿真/分析引擎在检测点同步抛出的错误
// 说明: 引擎内部不重试, 重试由调用方修正配置后重新请求
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎错误
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ==========================================
    // 配置错误 (ConfigurationError 族)
    // ==========================================
    #[error("未知爬坡曲线预设: {name}")]
    UnknownRampPreset { name: String },

    #[error("未知站点: {site_id}")]
    UnknownSite { site_id: String },

    #[error("配置无效: {0}")]
    InvalidConfiguration(String),

    // ==========================================
    // 区间错误
    // ==========================================
    #[error("日期区间无效: start={start} 晚于 end={end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    // ==========================================
    // 数据形状错误
    // ==========================================
    #[error("数据形状不一致: {context}, constrained={constrained_len}天, unconstrained={unconstrained_len}天")]
    DataShape {
        context: String,
        constrained_len: usize,
        unconstrained_len: usize,
    },
}

impl EngineError {
    /// 是否属于配置错误族 (预设/站点/配置值)
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownRampPreset { .. }
                | EngineError::UnknownSite { .. }
                | EngineError::InvalidConfiguration(_)
        )
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_family() {
        assert!(EngineError::UnknownSite { site_id: "X".into() }.is_configuration_error());
        assert!(EngineError::UnknownRampPreset { name: "x".into() }.is_configuration_error());
        assert!(EngineError::InvalidConfiguration("bad".into()).is_configuration_error());

        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(!EngineError::InvalidRange { start: d, end: d }.is_configuration_error());
    }

    #[test]
    fn test_message_carries_reason() {
        let err = EngineError::UnknownSite { site_id: "FAB-9".into() };
        assert!(err.to_string().contains("FAB-9"));
    }
}
