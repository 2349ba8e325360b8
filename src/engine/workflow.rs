// ==========================================
// 产线点检系统 - 停线单流程状态机
// ==========================================
// 状态: 待说明 → 待签字 → 已闭环 (终态)
// 职责: 校验入参、判定迁移是否合法、生成补丁
// 红线: 不访问存储；写入由 API 层以 CAS 方式完成
// 红线: 不提供回退迁移，不提供删除
// ==========================================

use crate::domain::entity::Actor;
use crate::domain::incident::{IncidentPatch, NewStoppageIncident, StoppageDetails, StoppageIncident};
use crate::domain::types::IncidentStatus;
use crate::engine::authorization::AuthorizationPredicate;
use chrono::{DateTime, Utc};
use thiserror::Error;

// ==========================================
// WorkflowError - 流程错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("必填字段缺失: {field}")]
    Validation { field: String },

    #[error("停线单 {incident_id} 状态不允许该操作: 当前 {from}, 需要 {expected}")]
    InvalidStateTransition {
        incident_id: String,
        from: IncidentStatus,
        expected: IncidentStatus,
    },

    #[error("{actor} 无权处理停线单 {incident_id} (责任部门: {sector})")]
    PermissionDenied {
        actor: String,
        incident_id: String,
        sector: String,
    },
}

impl WorkflowError {
    fn missing(field: &str) -> Self {
        WorkflowError::Validation {
            field: field.to_string(),
        }
    }
}

// ==========================================
// StoppageWorkflow - 无状态流程引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct StoppageWorkflow;

impl StoppageWorkflow {
    pub fn new() -> Self {
        Self
    }

    /// 新建停线单（初始状态: 待说明）
    pub fn open(
        &self,
        draft: NewStoppageIncident,
        now: DateTime<Utc>,
    ) -> Result<StoppageIncident, WorkflowError> {
        require(&draft.line, "line")?;
        require(&draft.details.start_time, "start_time")?;
        require(&draft.narrative, "narrative")?;
        require(&draft.responsible_sector, "responsible_sector")?;

        let mut details = draft.details;
        details.total_time = StoppageDetails::derive_total_time(&details.start_time, &details.end_time);

        Ok(StoppageIncident {
            incident_id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            line: draft.line.trim().to_string(),
            reported_by: draft.reported_by,
            reporter_name: draft.reporter_name,
            reporter_role: draft.reporter_role,
            responsible_sector: draft.responsible_sector.trim().to_string(),
            narrative: draft.narrative,
            details,
            status: IncidentStatus::WaitingJustification,
            justification: None,
            justified_by: None,
            justified_at: None,
            signed_document_ref: None,
        })
    }

    /// 责任方说明（待说明 → 待签字）
    ///
    /// 校验顺序: 说明文本 → 当前状态 → 授权
    pub fn justify(
        &self,
        incident: &StoppageIncident,
        actor: &Actor,
        text: &str,
        now: DateTime<Utc>,
        predicate: &dyn AuthorizationPredicate,
    ) -> Result<IncidentPatch, WorkflowError> {
        require(text, "justification")?;
        expect_status(incident, IncidentStatus::WaitingJustification)?;

        if !predicate.is_authorized_for(actor, incident) {
            return Err(WorkflowError::PermissionDenied {
                actor: actor.user_id.clone(),
                incident_id: incident.incident_id.clone(),
                sector: incident.responsible_sector.clone(),
            });
        }

        Ok(IncidentPatch::Justify {
            justification: text.trim().to_string(),
            justified_by: actor.name.clone(),
            justified_at: now,
        })
    }

    /// 上传签字单（待签字 → 已闭环），不限角色
    pub fn attach_signed_document(
        &self,
        incident: &StoppageIncident,
        document_ref: &str,
    ) -> Result<IncidentPatch, WorkflowError> {
        require(document_ref, "document_ref")?;
        expect_status(incident, IncidentStatus::WaitingSignature)?;

        Ok(IncidentPatch::AttachSignedDocument {
            document_ref: document_ref.trim().to_string(),
        })
    }
}

fn require(value: &str, field: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(WorkflowError::missing(field));
    }
    Ok(())
}

fn expect_status(incident: &StoppageIncident, expected: IncidentStatus) -> Result<(), WorkflowError> {
    if incident.status != expected {
        return Err(WorkflowError::InvalidStateTransition {
            incident_id: incident.incident_id.clone(),
            from: incident.status,
            expected,
        });
    }
    Ok(())
}
