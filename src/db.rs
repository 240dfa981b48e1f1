// ==========================================
// 产量计划仿真与分析系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少 CLI 与测试并发访问同一配置库时的 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout (毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置库路径环境变量
pub const CONFIG_DB_ENV: &str = "PRODUCTION_PLAN_APS_CONFIG_DB";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明: foreign_keys 与 busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认配置库路径
///
/// 优先级: 环境变量 > 系统数据目录 > 当前目录
pub fn default_config_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_DB_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let Some(data_dir) = dirs::data_dir() else {
        return PathBuf::from("./config.db");
    };

    let dir = data_dir.join(crate::APP_NAME);
    // 确保目录存在
    std::fs::create_dir_all(&dir).ok();
    dir.join("config.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_applies_pragmas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        let conn = open_sqlite_connection(path.to_str().unwrap()).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_config_db_path().ends_with("config.db"));
    }
}
