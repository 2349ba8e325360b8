// ==========================================
// 产线点检系统 - 配置层
// ==========================================
// 职责: 系统配置管理 (管理层角色、班组长标记、工厂时区等)
// 存储: config_kv 表
// ==========================================

pub mod audit_config_trait;
pub mod config_manager;
pub mod settings;

// 重导出核心配置管理器
pub use audit_config_trait::AuditConfigReader;
pub use config_manager::{config_keys, ConfigManager};
pub use settings::AuditSettings;
