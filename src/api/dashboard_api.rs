// ==========================================
// 产线点检系统 - 驾驶舱 API
// ==========================================
// 职责: 待处理停线单数量、今日未点检班组长、操作日志查询
// 说明: 谁能看到这些提醒由调用方决定
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::error::{ApiError, ApiResult};
use crate::config::AuditConfigReader;
use crate::domain::action_log::ActionLog;
use crate::domain::entity::Actor;
use crate::domain::log_entry::{inspections, stoppages};
use crate::engine::alerts::AlertAggregator;
use crate::engine::authorization::AuthorizationPredicate;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::log_store::LogStore;

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    store: Arc<dyn LogStore>,
    config: Arc<dyn AuditConfigReader>,
    predicate: Arc<dyn AuthorizationPredicate>,
    action_log_repo: Arc<ActionLogRepository>,
    aggregator: AlertAggregator,
}

impl DashboardApi {
    pub fn new(
        store: Arc<dyn LogStore>,
        config: Arc<dyn AuditConfigReader>,
        predicate: Arc<dyn AuthorizationPredicate>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            store,
            config,
            predicate,
            action_log_repo,
            aggregator: AlertAggregator::new(),
        }
    }

    /// 操作人可处理的待说明停线单数量
    pub async fn pending_count_for(&self, actor: &Actor) -> ApiResult<usize> {
        let entries = self.store.fetch_all().await?;
        Ok(self
            .aggregator
            .pending_stoppage_count(actor, stoppages(&entries), self.predicate.as_ref()))
    }

    /// 截至 `as_of` 当天尚未提交生产点检的班组长姓名
    pub async fn missing_leaders_today(&self, as_of: DateTime<Utc>) -> ApiResult<Vec<String>> {
        let (offset, markers, directory, entries) = futures::try_join!(
            self.config.get_plant_offset(),
            self.config.get_leader_role_markers(),
            self.store.fetch_entities(),
            self.store.fetch_all(),
        )?;

        Ok(self.aggregator.missing_submissions_today(
            &directory,
            inspections(&entries),
            as_of,
            offset,
            &markers,
        ))
    }

    /// 操作人最近的操作日志
    pub fn list_action_logs_by_actor(&self, actor: &str, limit: i32) -> ApiResult<Vec<ActionLog>> {
        if actor.trim().is_empty() {
            return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
        }
        if limit <= 0 || limit > 1000 {
            return Err(ApiError::InvalidInput("limit必须在1-1000之间".to_string()));
        }
        Ok(self.action_log_repo.find_by_actor(actor, limit)?)
    }
}
