// ==========================================
// 产线点检系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// 约定: 值非法时记录 warn 并回退默认值，不中断业务
// ==========================================

use crate::config::audit_config_trait::AuditConfigReader;
use crate::config::settings::AuditSettings;
use crate::db::{format_ts, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 按数据库文件路径创建
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与仓储共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value, format_ts(&Utc::now())],
        )?;
        tracing::info!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// CSV 列表，空列表回退默认值
    fn get_csv_or_default(&self, key: &str, default: &str) -> RepositoryResult<Vec<String>> {
        let value = self.get_config_or_default(key, default)?;
        let items = split_csv(&value);
        if items.is_empty() {
            tracing::warn!(key = %key, value = %value, "配置列表为空，使用默认值");
            return Ok(split_csv(default));
        }
        Ok(items)
    }

    /// 解析当前配置快照
    pub async fn load_settings(&self) -> RepositoryResult<AuditSettings> {
        AuditSettings::load(self).await
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait]
impl AuditConfigReader for ConfigManager {
    async fn get_leadership_roles(&self) -> RepositoryResult<Vec<String>> {
        self.get_csv_or_default(config_keys::LEADERSHIP_ROLES, defaults::LEADERSHIP_ROLES)
    }

    async fn get_leader_role_markers(&self) -> RepositoryResult<Vec<String>> {
        self.get_csv_or_default(config_keys::LEADER_ROLE_MARKERS, defaults::LEADER_ROLE_MARKERS)
    }

    async fn get_plant_offset(&self) -> RepositoryResult<FixedOffset> {
        let value = self.get_config_or_default(
            config_keys::PLANT_UTC_OFFSET_MINUTES,
            &defaults::PLANT_UTC_OFFSET_MINUTES.to_string(),
        )?;

        let offset = value
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60));

        match offset {
            Some(o) => Ok(o),
            None => {
                tracing::warn!(value = %value, "工厂时区配置非法，使用默认值");
                Ok(defaults::plant_offset())
            }
        }
    }

    async fn get_stoppage_sectors(&self) -> RepositoryResult<Vec<String>> {
        self.get_csv_or_default(config_keys::STOPPAGE_SECTORS, defaults::STOPPAGE_SECTORS)
    }

    async fn get_sector_aliases(&self) -> RepositoryResult<Vec<(String, String)>> {
        let value = self.get_config_or_default(config_keys::SECTOR_ALIASES, defaults::SECTOR_ALIASES)?;
        let aliases = parse_sector_aliases(&value);
        if aliases.is_empty() && !value.trim().is_empty() {
            tracing::warn!(value = %value, "部门别名配置无有效项，使用默认值");
            return Ok(parse_sector_aliases(defaults::SECTOR_ALIASES));
        }
        Ok(aliases)
    }
}

/// 解析部门别名 "A=B,C=D"（统一转大写，格式错误的项跳过）
pub(crate) fn parse_sector_aliases(raw: &str) -> Vec<(String, String)> {
    split_csv(raw)
        .into_iter()
        .filter_map(|item| match item.split_once('=') {
            Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
                Some((a.trim().to_uppercase(), b.trim().to_uppercase()))
            }
            _ => {
                tracing::warn!(item = %item, "部门别名格式应为 A=B，已跳过");
                None
            }
        })
        .collect()
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 停线单授权
    pub const LEADERSHIP_ROLES: &str = "leadership_roles";

    // 班组长识别
    pub const LEADER_ROLE_MARKERS: &str = "leader_role_markers";

    // 工厂本地时区 (相对 UTC 的分钟数)
    pub const PLANT_UTC_OFFSET_MINUTES: &str = "plant_utc_offset_minutes";

    // 停线责任部门
    pub const STOPPAGE_SECTORS: &str = "stoppage_sectors";

    // 责任部门别名 (A=B，双向等价)
    pub const SECTOR_ALIASES: &str = "sector_aliases";
}

pub(crate) mod defaults {
    use chrono::{FixedOffset, Offset, Utc};

    pub const LEADERSHIP_ROLES: &str = "SUPERVISOR,COORDENADOR,DIRETOR,ADMIN,GERENTE";
    pub const LEADER_ROLE_MARKERS: &str = "lider,líder,supervisor,coordenador";
    pub const PLANT_UTC_OFFSET_MINUTES: i32 = -240;
    pub const STOPPAGE_SECTORS: &str =
        "GQ,PRODUÇÃO,SMD/IAC,PRÉ-FORMA,MANUTENÇÃO,MATERIAIS,PCP,ÁREA TÉCNICA,EXTERNO";
    pub const SECTOR_ALIASES: &str =
        "MAINTENANCE=MANUTENÇÃO,PRODUCTION=PRODUÇÃO,MATERIALS=MATERIAIS,QUALITY=GQ";

    pub fn plant_offset() -> FixedOffset {
        FixedOffset::east_opt(PLANT_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let cfg = setup();
        assert_eq!(
            cfg.get_leadership_roles().await.unwrap(),
            vec!["SUPERVISOR", "COORDENADOR", "DIRETOR", "ADMIN", "GERENTE"]
        );
        assert_eq!(cfg.get_plant_offset().await.unwrap().local_minus_utc(), -240 * 60);
        assert!(cfg
            .get_stoppage_sectors()
            .await
            .unwrap()
            .contains(&"MANUTENÇÃO".to_string()));
    }

    #[tokio::test]
    async fn test_overrides_and_fallbacks() {
        let cfg = setup();
        cfg.set_global_config_value(config_keys::LEADERSHIP_ROLES, " gerente , diretor ,")
            .unwrap();
        cfg.set_global_config_value(config_keys::PLANT_UTC_OFFSET_MINUTES, "180")
            .unwrap();
        cfg.set_global_config_value(config_keys::LEADER_ROLE_MARKERS, " , ")
            .unwrap();

        assert_eq!(cfg.get_leadership_roles().await.unwrap(), vec!["gerente", "diretor"]);
        assert_eq!(cfg.get_plant_offset().await.unwrap().local_minus_utc(), 180 * 60);
        assert_eq!(cfg.get_leader_role_markers().await.unwrap().len(), 4);

        cfg.set_global_config_value(config_keys::PLANT_UTC_OFFSET_MINUTES, "abc")
            .unwrap();
        assert_eq!(cfg.get_plant_offset().await.unwrap().local_minus_utc(), -240 * 60);
    }

    #[tokio::test]
    async fn test_values_persist_in_db_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cfg.db").to_string_lossy().to_string();
        {
            let conn = crate::db::open_sqlite_connection(&db_path).unwrap();
            crate::db::init_schema(&conn).unwrap();
        }

        let writer = ConfigManager::new(&db_path).unwrap();
        writer
            .set_global_config_value(config_keys::STOPPAGE_SECTORS, "GQ,PCP")
            .unwrap();

        let reader = ConfigManager::new(&db_path).unwrap();
        assert_eq!(
            reader.get_global_config_value(config_keys::STOPPAGE_SECTORS).unwrap(),
            Some("GQ,PCP".to_string())
        );
        let settings = reader.load_settings().await.unwrap();
        assert_eq!(settings.stoppage_sectors, vec!["GQ", "PCP"]);
    }

    #[tokio::test]
    async fn test_sector_aliases_default_and_override() {
        let cfg = setup();
        let aliases = cfg.get_sector_aliases().await.unwrap();
        assert!(aliases.contains(&("MAINTENANCE".to_string(), "MANUTENÇÃO".to_string())));

        cfg.set_global_config_value(config_keys::SECTOR_ALIASES, " qualidade = gq , broken ")
            .unwrap();
        assert_eq!(
            cfg.get_sector_aliases().await.unwrap(),
            vec![("QUALIDADE".to_string(), "GQ".to_string())]
        );

        // 只有非法项时回退默认值
        cfg.set_global_config_value(config_keys::SECTOR_ALIASES, "broken")
            .unwrap();
        assert_eq!(cfg.get_sector_aliases().await.unwrap().len(), 4);

        // 显式清空表示不使用别名
        cfg.set_global_config_value(config_keys::SECTOR_ALIASES, "").unwrap();
        assert!(cfg.get_sector_aliases().await.unwrap().is_empty());
    }
}
