// ==========================================
// 产线点检系统 - 日志存储 Trait
// ==========================================
// 职责: 点检记录与停线单的追加存储 + 人员/产线/工位目录
// 红线: Repository 不含业务规则，只做数据读写
// 红线: 停线单状态写入必须是单条件更新 (CAS)，未命中即失败
// ==========================================

mod core;
mod queries;


pub use self::core::SqliteLogStore;

use crate::domain::entity::AuditEntity;
use crate::domain::incident::{IncidentPatch, StoppageIncident};
use crate::domain::inspection::InspectionRecord;
use crate::domain::log_entry::LogEntry;
use crate::domain::types::{IncidentStatus, InspectionKind};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// LogStore Trait
// ==========================================
// 实现者: SqliteLogStore（使用 rusqlite）
#[async_trait]
pub trait LogStore: Send + Sync {
    // ===== 读取 =====

    /// 全部点检记录与停线单，按时间升序混合返回
    async fn fetch_all(&self) -> RepositoryResult<Vec<LogEntry>>;

    /// 审计对象目录：产线、维护工位、全部人员 (LEADER 候选)
    async fn fetch_entities(&self) -> RepositoryResult<Vec<AuditEntity>>;

    /// 按 ID 查询停线单
    async fn find_incident(&self, incident_id: &str) -> RepositoryResult<Option<StoppageIncident>>;

    /// 按状态列出停线单（最新优先）
    async fn list_incidents_by_status(
        &self,
        status: IncidentStatus,
    ) -> RepositoryResult<Vec<StoppageIncident>>;

    /// 按类型列出点检记录（最新优先）
    async fn list_inspections(&self, kind: InspectionKind) -> RepositoryResult<Vec<InspectionRecord>>;

    // ===== 写入 =====

    async fn insert_inspection(&self, record: &InspectionRecord) -> RepositoryResult<()>;

    async fn insert_incident(&self, incident: &StoppageIncident) -> RepositoryResult<()>;

    /// 按补丁推进停线单状态
    ///
    /// # 返回
    /// - Ok(incident): 写入后的停线单
    /// - Err(NotFound): 停线单不存在
    /// - Err(InvalidStateTransition): 当前状态已不是补丁要求的状态
    async fn update_incident_status(
        &self,
        incident_id: &str,
        patch: &IncidentPatch,
    ) -> RepositoryResult<StoppageIncident>;
}
