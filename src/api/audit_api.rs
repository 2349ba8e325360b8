// ==========================================
// 产线点检系统 - 合规审计 API
// ==========================================
// 职责: 周标识解析、合规矩阵查询
// 红线: 周/班次/对象集合都是显式参数，不依赖界面状态
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::api::error::ApiResult;
use crate::config::{AuditConfigReader, AuditSettings};
use crate::domain::compliance::{ComplianceMatrix, MatrixKind};
use crate::domain::entity::AuditEntity;
use crate::domain::log_entry::LogEntry;
use crate::domain::types::{EntityKind, ShiftFilter};
use crate::domain::window::AuditWindow;
use crate::engine::compliance::{entities_of_kind, leader_entities, ComplianceMatrixBuilder};
use crate::engine::iso_week;
use crate::repository::log_store::LogStore;

/// 周标识 → 审计窗口；无效标识返回 None（表示尚未选择周）
pub fn resolve_window(week_token: &str) -> Option<AuditWindow> {
    iso_week::resolve_window(week_token)
}

/// 纯函数入口：给定对象、窗口、班次与记录构建矩阵
pub fn build_compliance_matrix(
    kind: MatrixKind,
    entities: &[AuditEntity],
    window: &AuditWindow,
    shift: ShiftFilter,
    entries: &[LogEntry],
    today: NaiveDate,
    offset: FixedOffset,
) -> ComplianceMatrix {
    let window = window.clone().with_shift(shift);
    ComplianceMatrixBuilder::new(offset).build(kind, entities, &window, entries, today)
}

// ==========================================
// AuditApi - 合规审计 API
// ==========================================
pub struct AuditApi {
    store: Arc<dyn LogStore>,
    config: Arc<dyn AuditConfigReader>,
}

impl AuditApi {
    pub fn new(store: Arc<dyn LogStore>, config: Arc<dyn AuditConfigReader>) -> Self {
        Self { store, config }
    }

    /// 查询某周的合规矩阵
    ///
    /// # 参数
    /// - `kind`: 产线 / 维护 / 班组长
    /// - `week_token`: "YYYY-Www"，无效时返回空矩阵
    /// - `shift`: 班次参数，空串或 "ALL" 表示全部
    /// - `as_of`: 当前时刻，用于判定漏检与待检
    pub async fn matrix_for_week(
        &self,
        kind: MatrixKind,
        week_token: &str,
        shift: &str,
        as_of: DateTime<Utc>,
    ) -> ApiResult<ComplianceMatrix> {
        let window = match iso_week::resolve_window_with_shift(week_token, ShiftFilter::parse(shift)) {
            Some(w) => w,
            None => return Ok(ComplianceMatrix::empty(kind)),
        };

        let (settings, directory, entries) = futures::try_join!(
            AuditSettings::load(self.config.as_ref()),
            self.store.fetch_entities(),
            self.store.fetch_all(),
        )?;

        let entities = select_entities(kind, &directory, &settings);
        let today = as_of.with_timezone(&settings.plant_offset).date_naive();

        Ok(ComplianceMatrixBuilder::new(settings.plant_offset).build(
            kind, &entities, &window, &entries, today,
        ))
    }

    /// 未选择周时默认展示的周标识
    pub async fn current_week_token(&self, now: DateTime<Utc>) -> ApiResult<String> {
        let offset = self.config.get_plant_offset().await?;
        Ok(iso_week::current_week_token(now, offset))
    }
}

/// 按矩阵类型挑出行对象
fn select_entities(kind: MatrixKind, directory: &[AuditEntity], settings: &AuditSettings) -> Vec<AuditEntity> {
    match kind.entity_kind() {
        EntityKind::Leader => leader_entities(directory, &settings.leader_role_markers),
        other => entities_of_kind(directory, other),
    }
}
