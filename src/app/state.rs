// ==========================================
// 产线点检系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::{AuditApi, DashboardApi, InspectionApi, StoppageApi};
use crate::config::{AuditConfigReader, AuditSettings, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::authorization::{AuthorizationPredicate, SectorRolePolicy};
use crate::repository::{ActionLogRepository, LogStore, SqliteLogStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "LINE_AUDIT_DB";

/// 应用状态
///
/// 所有 API 共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的配置快照
    pub settings: AuditSettings,

    pub store: Arc<SqliteLogStore>,
    pub config_manager: Arc<ConfigManager>,
    pub action_log_repo: Arc<ActionLogRepository>,

    pub stoppage_api: Arc<StoppageApi>,
    pub audit_api: Arc<AuditApi>,
    pub inspection_api: Arc<InspectionApi>,
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 打开数据库、建表并组装 API
    ///
    /// 管理层角色在启动时读取；修改配置后需重建 AppState 生效
    pub async fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        init_schema(&conn).context("建表失败")?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let store = Arc::new(SqliteLogStore::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let settings = config_manager
            .load_settings()
            .await
            .context("读取配置失败")?;
        let predicate: Arc<dyn AuthorizationPredicate> =
            Arc::new(SectorRolePolicy::from_settings(&settings));

        // ==========================================
        // 初始化API层
        // ==========================================
        let store_dyn: Arc<dyn LogStore> = store.clone();
        let config_dyn: Arc<dyn AuditConfigReader> = config_manager.clone();

        let stoppage_api = Arc::new(StoppageApi::new(
            store_dyn.clone(),
            action_log_repo.clone(),
            predicate.clone(),
        ));
        let audit_api = Arc::new(AuditApi::new(store_dyn.clone(), config_dyn.clone()));
        let inspection_api = Arc::new(InspectionApi::new(
            store_dyn.clone(),
            action_log_repo.clone(),
            config_dyn.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            store_dyn,
            config_dyn,
            predicate,
            action_log_repo.clone(),
        ));

        tracing::info!(
            leadership_roles = ?settings.leadership_roles,
            plant_offset = %settings.plant_offset,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            settings,
            store,
            config_manager,
            action_log_repo,
            stoppage_api,
            audit_api,
            inspection_api,
            dashboard_api,
        })
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 LINE_AUDIT_DB（非空时）
/// - 否则: 用户数据目录/line-audit/line_audit.db
/// - 无法获取数据目录时: ./line_audit.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./line_audit.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("line-audit");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("line_audit.db");
        }
    }

    path.to_string_lossy().to_string()
}
