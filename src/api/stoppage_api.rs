// ==========================================
// 产线点检系统 - 停线单 API
// ==========================================
// 职责: 停线单新建、责任方说明、上传签字单、队列查询
// 流程: 读取 → 状态机判定 → 条件写入 (CAS) → ActionLog
// 红线: 迁移写入要么成功要么失败，不出现中间状态
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::recorded::Recorded;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::entity::Actor;
use crate::domain::incident::{NewStoppageIncident, StoppageIncident};
use crate::domain::types::IncidentStatus;
use crate::engine::authorization::AuthorizationPredicate;
use crate::engine::workflow::StoppageWorkflow;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::log_store::LogStore;

// ==========================================
// StoppageApi - 停线单 API
// ==========================================
pub struct StoppageApi {
    store: Arc<dyn LogStore>,
    action_log_repo: Arc<ActionLogRepository>,
    predicate: Arc<dyn AuthorizationPredicate>,
    workflow: StoppageWorkflow,
}

impl StoppageApi {
    pub fn new(
        store: Arc<dyn LogStore>,
        action_log_repo: Arc<ActionLogRepository>,
        predicate: Arc<dyn AuthorizationPredicate>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
            predicate,
            workflow: StoppageWorkflow::new(),
        }
    }

    // ==========================================
    // 流程迁移
    // ==========================================

    /// 新建停线单
    ///
    /// # 返回
    /// - Ok(Recorded<StoppageIncident>): 状态为待说明的新停线单
    /// - Err(ValidationError): 产线/开始时间/原因/责任部门缺失
    pub async fn create_incident(
        &self,
        draft: NewStoppageIncident,
    ) -> ApiResult<Recorded<StoppageIncident>> {
        let incident = self.workflow.open(draft, Utc::now())?;
        self.store.insert_incident(&incident).await?;

        tracing::info!(
            incident_id = %incident.incident_id,
            line = %incident.line,
            sector = %incident.responsible_sector,
            "停线单已创建"
        );

        let log = ActionLog::new(
            ActionType::CreateStoppage,
            &incident.reported_by,
            Some(&incident.incident_id),
        )
        .with_payload(json!({
            "line": incident.line,
            "responsible_sector": incident.responsible_sector,
            "start_time": incident.details.start_time,
            "total_time": incident.details.total_time,
        }))
        .with_detail(incident.narrative.clone());
        let logged = self.record(&log);

        Ok(Recorded::new(incident, logged))
    }

    /// 责任方说明（待说明 → 待签字）
    ///
    /// # 返回
    /// - Err(NotFound): 停线单不存在
    /// - Err(ValidationError): 说明为空
    /// - Err(InvalidStateTransition): 已被处理（含并发下的落后请求）
    /// - Err(PermissionDenied): 操作人无权处理该部门的停线单
    pub async fn justify_incident(
        &self,
        incident_id: &str,
        actor: &Actor,
        text: &str,
    ) -> ApiResult<Recorded<StoppageIncident>> {
        let incident = self.load(incident_id).await?;
        let patch = self
            .workflow
            .justify(&incident, actor, text, Utc::now(), self.predicate.as_ref())
            .map_err(|e| {
                tracing::warn!(incident_id = %incident_id, actor = %actor.user_id, error = %e, "责任方说明被拒绝");
                e
            })?;

        let updated = self.store.update_incident_status(incident_id, &patch).await?;

        tracing::info!(
            incident_id = %incident_id,
            actor = %actor.user_id,
            status = %updated.status,
            "停线单已说明"
        );

        let log = ActionLog::new(ActionType::JustifyStoppage, &actor.user_id, Some(incident_id))
            .with_payload(json!({
                "justified_by": updated.justified_by,
                "actor_role": actor.role,
            }))
            .with_detail(text.trim().to_string());
        let logged = self.record(&log);

        Ok(Recorded::new(updated, logged))
    }

    /// 上传签字单（待签字 → 已闭环），不限角色
    pub async fn attach_signed_document(
        &self,
        incident_id: &str,
        actor: &Actor,
        document_ref: &str,
    ) -> ApiResult<Recorded<StoppageIncident>> {
        let incident = self.load(incident_id).await?;
        let patch = self.workflow.attach_signed_document(&incident, document_ref)?;
        let updated = self.store.update_incident_status(incident_id, &patch).await?;

        tracing::info!(
            incident_id = %incident_id,
            actor = %actor.user_id,
            status = %updated.status,
            "签字单已上传，停线单闭环"
        );

        let log = ActionLog::new(ActionType::AttachSignedDocument, &actor.user_id, Some(incident_id))
            .with_payload(json!({ "document_ref": updated.signed_document_ref }));
        let logged = self.record(&log);

        Ok(Recorded::new(updated, logged))
    }

    // ==========================================
    // 查询
    // ==========================================

    pub async fn get_incident(&self, incident_id: &str) -> ApiResult<StoppageIncident> {
        self.load(incident_id).await
    }

    /// 按状态列出停线单（最新优先）
    pub async fn list_by_status(&self, status: IncidentStatus) -> ApiResult<Vec<StoppageIncident>> {
        Ok(self.store.list_incidents_by_status(status).await?)
    }

    /// 待说明队列
    pub async fn list_pending_justification(&self) -> ApiResult<Vec<StoppageIncident>> {
        self.list_by_status(IncidentStatus::WaitingJustification).await
    }

    /// 待签字队列
    pub async fn list_waiting_signature(&self) -> ApiResult<Vec<StoppageIncident>> {
        self.list_by_status(IncidentStatus::WaitingSignature).await
    }

    /// 已闭环历史
    pub async fn list_completed(&self) -> ApiResult<Vec<StoppageIncident>> {
        self.list_by_status(IncidentStatus::Completed).await
    }

    /// 停线单操作轨迹
    pub fn incident_history(&self, incident_id: &str) -> ApiResult<Vec<ActionLog>> {
        if incident_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("停线单ID不能为空".to_string()));
        }
        Ok(self.action_log_repo.find_by_incident(incident_id)?)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    async fn load(&self, incident_id: &str) -> ApiResult<StoppageIncident> {
        if incident_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("停线单ID不能为空".to_string()));
        }
        self.store
            .find_incident(incident_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("停线单(id={})不存在", incident_id)))
    }

    /// 迁移已提交，日志失败不回滚，结果中标记 action_logged = false
    fn record(&self, log: &ActionLog) -> bool {
        match self.action_log_repo.insert(log) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    action_type = %log.action_type,
                    incident_id = ?log.incident_id,
                    "记录操作日志失败: {}",
                    e
                );
                false
            }
        }
    }
}
