// ==========================================
// 产线点检系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod log_store;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use log_store::{LogStore, SqliteLogStore};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

/// 读取 UTC 时间戳列
pub(crate) fn read_ts(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    crate::db::parse_ts(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(RepositoryError::FieldValueError {
                field: format!("column#{}", idx),
                message: format!("无法解析时间戳: {}", raw),
            }),
        )
    })
}
