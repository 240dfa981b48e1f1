// ==========================================
// 产量计划仿真与分析系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 行号口径: 表头为第 1 行, 数据从第 2 行起
// ==========================================

use crate::engine::error::EngineError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 字段错误 =====
    #[error("字段缺失 ({file} 行 {row}): {field}")]
    MissingField {
        file: String,
        row: usize,
        field: String,
    },

    #[error("字段值无效 ({file} 行 {row}, 字段 {field}): {value} ({message})")]
    InvalidValue {
        file: String,
        row: usize,
        field: String,
        value: String,
        message: String,
    },

    // ===== 数据校验错误 =====
    #[error("未知爬坡曲线预设 ({file} 行 {row}): {preset}")]
    UnknownRampPreset {
        file: String,
        row: usize,
        preset: String,
    },

    #[error("CTB 上限引用了未知站点 (行 {row}): {site_id}")]
    UnknownCtbSite { row: usize, site_id: String },

    #[error("CTB 上限重复 (行 {row}): 站点 {site_id} 日期 {date}")]
    DuplicateCtbLimit {
        row: usize,
        site_id: String,
        date: String,
    },

    #[error("基础数据校验失败: {0}")]
    Validation(#[from] EngineError),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}
