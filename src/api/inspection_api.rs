// ==========================================
// 产线点检系统 - 点检提交 API
// ==========================================
// 职责: 点检提交 (只追加)、点检历史查询
// 红线: 点检记录提交后不可修改、不可删除
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::recorded::Recorded;
use crate::config::AuditConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::inspection::{InspectionRecord, NewInspection};
use crate::domain::types::{InspectionKind, ShiftFilter};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::log_store::LogStore;

pub struct InspectionApi {
    store: Arc<dyn LogStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn AuditConfigReader>,
}

impl InspectionApi {
    pub fn new(
        store: Arc<dyn LogStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn AuditConfigReader>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
            config,
        }
    }

    /// 提交点检
    ///
    /// # 校验
    /// - 产线/工位、执行人不能为空
    /// - 不良项数不能超过检查项数
    /// - 维护点检必须指定维护对象
    ///
    /// 操作日志写入失败时点检记录仍保留，返回 action_logged = false
    pub async fn submit(&self, input: NewInspection) -> ApiResult<Recorded<InspectionRecord>> {
        validate(&input)?;

        let record = InspectionRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            kind: input.kind,
            line: input.line.trim().to_string(),
            performed_by: input.performed_by.trim().to_string(),
            performer_name: input.performer_name,
            performer_role: input.performer_role,
            shift: input.shift.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            maintenance_target: input.maintenance_target.map(|s| s.trim().to_string()),
            submitted_at: Utc::now(),
            items_count: input.items_count,
            ng_count: input.ng_count,
            observation: input.observation,
        };

        self.store.insert_inspection(&record).await?;

        tracing::info!(
            record_id = %record.record_id,
            kind = %record.kind,
            line = %record.line,
            ng_count = record.ng_count,
            "点检已提交"
        );

        let log = ActionLog::new(ActionType::SubmitInspection, &record.performed_by, None).with_payload(json!({
            "record_id": record.record_id,
            "kind": record.kind.to_db_str(),
            "line": record.line,
            "items_count": record.items_count,
            "ng_count": record.ng_count,
        }));
        let logged = match self.action_log_repo.insert(&log) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(record_id = %record.record_id, "记录操作日志失败: {}", e);
                false
            }
        };

        Ok(Recorded::new(record, logged))
    }

    /// 点检历史（最新优先），可按工厂本地日期与班次过滤
    pub async fn history(
        &self,
        kind: InspectionKind,
        day: Option<NaiveDate>,
        shift: &ShiftFilter,
    ) -> ApiResult<Vec<InspectionRecord>> {
        let offset = self.config.get_plant_offset().await?;
        let records = self.store.list_inspections(kind).await?;

        Ok(records
            .into_iter()
            .filter(|r| day.map_or(true, |d| r.local_date(offset) == d))
            .filter(|r| shift.accepts(r.shift.as_deref()))
            .collect())
    }
}

fn validate(input: &NewInspection) -> ApiResult<()> {
    if input.line.trim().is_empty() {
        return Err(ApiError::ValidationError("产线/工位不能为空".to_string()));
    }
    if input.performed_by.trim().is_empty() {
        return Err(ApiError::ValidationError("执行人不能为空".to_string()));
    }
    if input.ng_count > input.items_count {
        return Err(ApiError::ValidationError(format!(
            "不良项数({})超过检查项数({})",
            input.ng_count, input.items_count
        )));
    }
    if input.kind == InspectionKind::Maintenance
        && input
            .maintenance_target
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
    {
        return Err(ApiError::ValidationError("维护点检必须指定维护对象".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewInspection {
        NewInspection {
            kind: InspectionKind::Production,
            line: "LINE-01".to_string(),
            performed_by: "1001".to_string(),
            performer_name: "Ana Lima".to_string(),
            performer_role: Some("Líder".to_string()),
            shift: Some("1".to_string()),
            maintenance_target: None,
            items_count: 5,
            ng_count: 0,
            observation: None,
        }
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(validate(&input()).is_ok());

        let mut bad = input();
        bad.line = " ".to_string();
        assert!(matches!(validate(&bad), Err(ApiError::ValidationError(_))));

        let mut bad = input();
        bad.ng_count = 6;
        assert!(matches!(validate(&bad), Err(ApiError::ValidationError(_))));

        let mut bad = input();
        bad.kind = InspectionKind::Maintenance;
        assert!(matches!(validate(&bad), Err(ApiError::ValidationError(_))));
        bad.maintenance_target = Some("FORNO".to_string());
        assert!(validate(&bad).is_ok());
    }
}
