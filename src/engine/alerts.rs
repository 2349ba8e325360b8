// ==========================================
// 产线点检系统 - 告警汇总引擎
// ==========================================
// 职责: 从同一批记录派生两类提醒
//   1. 操作人可处理的待说明停线单数量
//   2. 今日尚未提交生产点检的班组长
// 红线: 纯计算，谁能看到提醒由调用方决定
// ==========================================

use crate::domain::entity::{Actor, AuditEntity};
use crate::domain::incident::StoppageIncident;
use crate::domain::inspection::InspectionRecord;
use crate::domain::types::{IncidentStatus, InspectionKind};
use crate::engine::authorization::AuthorizationPredicate;
use crate::engine::compliance::leader_entities;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertAggregator;

impl AlertAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 操作人有权处理的待说明停线单数量
    pub fn pending_stoppage_count<'a>(
        &self,
        actor: &Actor,
        incidents: impl IntoIterator<Item = &'a StoppageIncident>,
        predicate: &dyn AuthorizationPredicate,
    ) -> usize {
        incidents
            .into_iter()
            .filter(|i| i.status == IncidentStatus::WaitingJustification)
            .filter(|i| predicate.is_authorized_for(actor, i))
            .count()
    }

    /// 今日（工厂本地日）没有生产点检记录的班组长姓名
    ///
    /// `directory` 为人员目录，按 `markers` 挑出班组长
    pub fn missing_submissions_today<'a>(
        &self,
        directory: &[AuditEntity],
        records: impl IntoIterator<Item = &'a InspectionRecord>,
        as_of: DateTime<Utc>,
        offset: FixedOffset,
        markers: &[String],
    ) -> Vec<String> {
        let today = as_of.with_timezone(&offset).date_naive();

        let submitted: HashSet<&str> = records
            .into_iter()
            .filter(|r| r.kind == InspectionKind::Production && r.local_date(offset) == today)
            .map(|r| r.performed_by.as_str())
            .collect();

        let missing: Vec<String> = leader_entities(directory, markers)
            .into_iter()
            .filter(|leader| !submitted.contains(leader.entity_id.as_str()))
            .map(|leader| leader.name)
            .collect();

        tracing::debug!(
            day = %today,
            submitted = submitted.len(),
            missing = missing.len(),
            "今日点检缺失统计"
        );

        missing
    }
}
