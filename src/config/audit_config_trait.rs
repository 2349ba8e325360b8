// ==========================================
// 产线点检系统 - 审计配置读取 Trait
// ==========================================
// 职责: 定义引擎/API 所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::FixedOffset;

// ==========================================
// AuditConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AuditConfigReader: Send + Sync {
    /// 管理层角色（精确匹配即可处理任意停线单）
    ///
    /// # 默认值
    /// - SUPERVISOR, COORDENADOR, DIRETOR, ADMIN, GERENTE
    async fn get_leadership_roles(&self) -> RepositoryResult<Vec<String>>;

    /// 班组长职务标记（职务包含任一标记即视为班组长）
    ///
    /// # 默认值
    /// - lider, líder, supervisor, coordenador
    async fn get_leader_role_markers(&self) -> RepositoryResult<Vec<String>>;

    /// 工厂本地时区
    ///
    /// # 默认值
    /// - UTC-04:00
    async fn get_plant_offset(&self) -> RepositoryResult<FixedOffset>;

    /// 可选的停线责任部门
    async fn get_stoppage_sectors(&self) -> RepositoryResult<Vec<String>>;

    /// 责任部门别名对（双向等价，已转大写）
    ///
    /// # 默认值
    /// - MAINTENANCE=MANUTENÇÃO, PRODUCTION=PRODUÇÃO, MATERIALS=MATERIAIS, QUALITY=GQ
    async fn get_sector_aliases(&self) -> RepositoryResult<Vec<(String, String)>>;
}
