// ==========================================
// 产线点检系统 - 操作日志领域模型
// ==========================================
// 红线: 所有流程写入必须记录
// 用途: 审计追踪
// 对齐: action_log 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub incident_id: Option<String>, // 关联停线单 (点检提交为 None)
    pub action_type: String,         // 操作类型 (ActionType::as_str)
    pub action_ts: DateTime<Utc>,
    pub actor: String,               // 操作人工号

    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

impl ActionLog {
    pub fn new(action_type: ActionType, actor: &str, incident_id: Option<&str>) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            incident_id: incident_id.map(|s| s.to_string()),
            action_type: action_type.as_str().to_string(),
            action_ts: Utc::now(),
            actor: actor.to_string(),
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    SubmitInspection,     // 提交点检
    CreateStoppage,       // 新建停线单
    JustifyStoppage,      // 责任方说明
    AttachSignedDocument, // 上传签字单
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::SubmitInspection => "SUBMIT_INSPECTION",
            ActionType::CreateStoppage => "CREATE_STOPPAGE",
            ActionType::JustifyStoppage => "JUSTIFY_STOPPAGE",
            ActionType::AttachSignedDocument => "ATTACH_SIGNED_DOCUMENT",
        }
    }
}
