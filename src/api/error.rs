// ==========================================
// 产量计划仿真与分析系统 - API层错误类型
// ==========================================
// 职责: 汇总引擎/导入/配置错误, 转换为面向调用方的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    ConfigurationError(String),

    #[error("日期区间无效: {0}")]
    InvalidRange(String),

    // ==========================================
    // 计算错误
    // ==========================================
    #[error("数据形状错误: {0}")]
    DataShapeError(String),

    // ==========================================
    // 数据来源错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("配置读取失败: {0}")]
    ConfigStoreError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRange { .. } => ApiError::InvalidRange(err.to_string()),
            EngineError::DataShape { .. } => ApiError::DataShapeError(err.to_string()),
            EngineError::UnknownRampPreset { .. }
            | EngineError::UnknownSite { .. }
            | EngineError::InvalidConfiguration(_) => ApiError::ConfigurationError(err.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Validation(engine_err) => ApiError::from(engine_err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
