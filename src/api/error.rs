// ==========================================
// 产线点检系统 - API层错误类型
// ==========================================
// 职责: 统一仓储错误与流程错误，给调用方稳定的错误分类
// 界面映射 (调用方负责):
//   PermissionDenied → "无权操作"
//   InvalidStateTransition → 提示刷新
//   ValidationError → 标红缺失字段
// ==========================================

use crate::domain::types::IncidentStatus;
use crate::engine::workflow::WorkflowError;
use crate::repository::error::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 流程错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("无效的状态转换: id={id}, 当前={from}, 需要={expected}")]
    InvalidStateTransition {
        id: String,
        from: String,
        expected: String,
    },

    #[error("无权操作: {0}")]
    PermissionDenied(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    State,
    Authorization,
    NotFound,
    Storage,
    Internal,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ValidationError(_) | ApiError::InvalidInput(_) => ErrorKind::Validation,
            ApiError::InvalidStateTransition { .. } => ErrorKind::State,
            ApiError::PermissionDenied(_) => ErrorKind::Authorization,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::DatabaseError(_) => ErrorKind::Storage,
            ApiError::InternalError(_) | ApiError::Other(_) => ErrorKind::Internal,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::InvalidStateTransition { id, from, to } => {
                // 条件更新未命中: 目标状态的前一状态即为需要的状态
                let expected = IncidentStatus::from_str(&to)
                    .and_then(previous_status)
                    .map(|s| s.to_db_str().to_string())
                    .unwrap_or(to);
                ApiError::InvalidStateTransition { id, from, expected }
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::DatabaseError(format!("数据库连接失败: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Serialization(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

fn previous_status(status: IncidentStatus) -> Option<IncidentStatus> {
    match status {
        IncidentStatus::WaitingJustification => None,
        IncidentStatus::WaitingSignature => Some(IncidentStatus::WaitingJustification),
        IncidentStatus::Completed => Some(IncidentStatus::WaitingSignature),
    }
}

// ==========================================
// 从 WorkflowError 转换
// ==========================================
impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Validation { .. } => ApiError::ValidationError(message),
            WorkflowError::InvalidStateTransition {
                incident_id,
                from,
                expected,
            } => ApiError::InvalidStateTransition {
                id: incident_id,
                from: from.to_db_str().to_string(),
                expected: expected.to_db_str().to_string(),
            },
            WorkflowError::PermissionDenied { .. } => ApiError::PermissionDenied(message),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::NotFound {
            entity: "StoppageIncident".to_string(),
            id: "S1".to_string(),
        }
        .into();
        assert_eq!(api_err.kind(), ErrorKind::NotFound);
        assert!(api_err.to_string().contains("S1"));

        let api_err: ApiError = RepositoryError::InvalidStateTransition {
            id: "S1".to_string(),
            from: "WAITING_SIGNATURE".to_string(),
            to: "WAITING_SIGNATURE".to_string(),
        }
        .into();
        match api_err {
            ApiError::InvalidStateTransition { from, expected, .. } => {
                assert_eq!(from, "WAITING_SIGNATURE");
                assert_eq!(expected, "WAITING_JUSTIFICATION");
            }
            other => panic!("Expected InvalidStateTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_workflow_error_conversion() {
        let api_err: ApiError = WorkflowError::PermissionDenied {
            actor: "3001".to_string(),
            incident_id: "S1".to_string(),
            sector: "MAINTENANCE".to_string(),
        }
        .into();
        assert_eq!(api_err.kind(), ErrorKind::Authorization);

        let api_err: ApiError = WorkflowError::InvalidStateTransition {
            incident_id: "S1".to_string(),
            from: IncidentStatus::WaitingJustification,
            expected: IncidentStatus::WaitingSignature,
        }
        .into();
        assert_eq!(api_err.kind(), ErrorKind::State);

        let api_err: ApiError = WorkflowError::Validation {
            field: "narrative".to_string(),
        }
        .into();
        assert_eq!(api_err.kind(), ErrorKind::Validation);
    }
}
