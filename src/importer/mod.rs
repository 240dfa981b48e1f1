// ==========================================
// 产量计划仿真与分析系统 - 基础数据导入
// ==========================================
// 职责: CSV / Excel → SeedData, 导入即校验
// ==========================================

pub mod error;
pub mod file_parser;
pub mod seed_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use seed_importer::{apply_ctb_limits, SeedImporter};
