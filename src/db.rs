// ==========================================
// 产线点检系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等 (CREATE TABLE IF NOT EXISTS)
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// foreign_keys 与 busy_timeout 都需要每个连接单独配置
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

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            shift TEXT,
            is_admin INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS config_lines (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS config_stations (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS inspection_record (
            record_id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            line TEXT NOT NULL,
            performed_by TEXT NOT NULL,
            performer_name TEXT NOT NULL,
            performer_role TEXT,
            shift TEXT,
            maintenance_target TEXT,
            submitted_at TEXT NOT NULL,
            items_count INTEGER NOT NULL DEFAULT 0,
            ng_count INTEGER NOT NULL DEFAULT 0,
            observation TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_inspection_submitted
            ON inspection_record(submitted_at);

        CREATE TABLE IF NOT EXISTS stoppage_incident (
            incident_id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            line TEXT NOT NULL,
            reported_by TEXT NOT NULL,
            reporter_name TEXT NOT NULL,
            reporter_role TEXT,
            responsible_sector TEXT NOT NULL,
            narrative TEXT NOT NULL,
            details_json TEXT NOT NULL,
            status TEXT NOT NULL,
            justification TEXT,
            justified_by TEXT,
            justified_at TEXT,
            signed_document_ref TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_stoppage_status
            ON stoppage_incident(status, created_at);

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            incident_id TEXT,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            payload_json TEXT,
            detail TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_action_log_incident
            ON action_log(incident_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    // 历史状态值 OPEN 统一改写为待说明
    let migrated = conn.execute(
        "UPDATE stoppage_incident SET status = 'WAITING_JUSTIFICATION' WHERE UPPER(TRIM(status)) = 'OPEN'",
        [],
    )?;
    if migrated > 0 {
        tracing::info!(rows = migrated, "已规范化历史停线单状态 OPEN");
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![CURRENT_SCHEMA_VERSION, format_ts(&Utc::now())],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 时间戳统一存储为 UTC RFC3339（毫秒），字典序即时间序
pub fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 解析存储的时间戳
pub fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_init_schema_normalizes_legacy_open_status() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            r#"
            INSERT INTO stoppage_incident (
                incident_id, created_at, line, reported_by, reporter_name,
                responsible_sector, narrative, details_json, status
            ) VALUES ('legacy-1', '2024-01-29T12:00:00.000Z', 'LINE-01', '2001', 'Davi',
                      'MAINTENANCE', 'belt jam', '{}', 'open')
            "#,
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();
        let status: String = conn
            .query_row(
                "SELECT status FROM stoppage_incident WHERE incident_id = 'legacy-1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(status, "WAITING_JUSTIFICATION");
    }

    #[test]
    fn test_timestamp_roundtrip_keeps_order() {
        let a = Utc::now();
        let b = a + chrono::Duration::milliseconds(5);
        assert!(format_ts(&a) < format_ts(&b));
        assert_eq!(parse_ts(&format_ts(&a)).map(|t| t.timestamp_millis()), Some(a.timestamp_millis()));
    }
}
