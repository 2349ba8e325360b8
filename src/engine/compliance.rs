// ==========================================
// 产线点检系统 - 合规矩阵构建引擎
// ==========================================
// 职责: 按 (对象, 日) 汇总点检记录，派生 OK / NG / PENDING
// 输入: 对象集合 + 审计窗口 + 点检记录 + 今日日期
// 输出: ComplianceMatrix (派生数据，不落库)
// 红线: 纯函数，不读全局状态；数据缺失不报错
// ==========================================

use crate::domain::compliance::{ComplianceCell, ComplianceMatrix, ComplianceRow, MatrixKind};
use crate::domain::entity::AuditEntity;
use crate::domain::inspection::InspectionRecord;
use crate::domain::log_entry::{inspections, LogEntry};
use crate::domain::types::{CellStatus, EntityKind, ShiftFilter};
use crate::domain::window::AuditWindow;
use crate::engine::iso_week;
use chrono::{FixedOffset, NaiveDate};
use std::collections::HashMap;

/// 产线 NG 明细中多个执行人的分隔符
pub const NAME_SEPARATOR: &str = " / ";

// ==========================================
// ComplianceMatrixBuilder - 合规矩阵构建器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ComplianceMatrixBuilder {
    // 工厂本地时区，用于把提交时间归入自然日
    offset: FixedOffset,
}

impl ComplianceMatrixBuilder {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// 构建合规矩阵
    ///
    /// # 参数
    /// - `kind`: 矩阵类型（决定参与的点检类型与对象匹配方式）
    /// - `entities`: 矩阵行对象，按传入顺序输出
    /// - `window`: 审计窗口（含班次过滤）
    /// - `entries`: 日志存储返回的混合序列，停线单会被忽略
    /// - `today`: 工厂本地 "今天"，早于今天且无记录的格子判为 NG
    pub fn build(
        &self,
        kind: MatrixKind,
        entities: &[AuditEntity],
        window: &AuditWindow,
        entries: &[LogEntry],
        today: NaiveDate,
    ) -> ComplianceMatrix {
        let wanted = kind.inspection_kind();

        // 1-3. 按类型、班次、窗口筛选并分桶，桶内保持输入顺序
        let mut buckets: HashMap<(&str, NaiveDate), Vec<&InspectionRecord>> = HashMap::new();
        for record in inspections(entries) {
            if record.kind != wanted || !window.shift.accepts(record.shift.as_deref()) {
                continue;
            }
            let day = record.local_date(self.offset);
            if !window.contains(day) {
                continue;
            }
            buckets
                .entry((entity_ref(kind, record), day))
                .or_default()
                .push(record);
        }

        let days = iso_week::window_days(window.monday);
        let rows: Vec<ComplianceRow> = entities
            .iter()
            .filter(|e| row_visible(kind, e, &window.shift))
            .map(|entity| ComplianceRow {
                entity_id: entity.entity_id.clone(),
                entity_name: entity.name.clone(),
                cells: days
                    .iter()
                    .map(|day| {
                        let records = buckets
                            .get(&(entity.entity_id.as_str(), *day))
                            .map(|v| v.as_slice())
                            .unwrap_or(&[]);
                        derive_cell(kind, *day, records, today)
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!(
            kind = %kind,
            week = %window.token(),
            shift = %window.shift,
            rows = rows.len(),
            bucketed = buckets.len(),
            "合规矩阵构建完成"
        );

        ComplianceMatrix {
            kind,
            window: Some(window.clone()),
            rows,
        }
    }

    /// 按周标识构建矩阵；周标识无效时返回空矩阵
    pub fn build_for_token(
        &self,
        kind: MatrixKind,
        entities: &[AuditEntity],
        week_token: &str,
        shift: ShiftFilter,
        entries: &[LogEntry],
        today: NaiveDate,
    ) -> ComplianceMatrix {
        match iso_week::resolve_window_with_shift(week_token, shift) {
            Some(window) => self.build(kind, entities, &window, entries, today),
            None => ComplianceMatrix::empty(kind),
        }
    }
}

/// 记录归属的对象 ID
fn entity_ref(kind: MatrixKind, record: &InspectionRecord) -> &str {
    match kind {
        MatrixKind::Leaders => record.performed_by.as_str(),
        MatrixKind::Lines | MatrixKind::Maintenance => record.line.as_str(),
    }
}

/// 班组长矩阵按班次过滤行；产线/工位行不受班次影响
fn row_visible(kind: MatrixKind, entity: &AuditEntity, shift: &ShiftFilter) -> bool {
    match kind {
        MatrixKind::Leaders => shift.accepts(entity.shift.as_deref()),
        MatrixKind::Lines | MatrixKind::Maintenance => true,
    }
}

/// 单元格判定
fn derive_cell(
    kind: MatrixKind,
    day: NaiveDate,
    records: &[&InspectionRecord],
    today: NaiveDate,
) -> ComplianceCell {
    if records.is_empty() {
        let status = if day < today {
            CellStatus::Ng
        } else {
            CellStatus::Pending
        };
        return ComplianceCell {
            date: day,
            status,
            record_ids: Vec::new(),
            detail: None,
        };
    }

    let record_ids = records.iter().map(|r| r.record_id.clone()).collect();

    // 不良优先
    if !records.iter().any(|r| r.has_failure()) {
        return ComplianceCell {
            date: day,
            status: CellStatus::Ok,
            record_ids,
            detail: None,
        };
    }

    let detail = match kind {
        MatrixKind::Lines => Some(submitter_names(records)),
        MatrixKind::Maintenance => records
            .iter()
            .find(|r| r.has_failure())
            .and_then(|r| r.maintenance_target.clone()),
        MatrixKind::Leaders => None,
    };

    ComplianceCell {
        date: day,
        status: CellStatus::Ng,
        record_ids,
        detail,
    }
}

/// 执行人名去重（保持首次出现顺序）
fn submitter_names(records: &[&InspectionRecord]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        let name = record.performer_first_name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.join(NAME_SEPARATOR)
}

/// 从人员目录中挑出班组长（职务包含任一标记）
pub fn leader_entities(entities: &[AuditEntity], markers: &[String]) -> Vec<AuditEntity> {
    entities
        .iter()
        .filter(|e| e.kind == EntityKind::Leader && e.role_matches_any(markers))
        .cloned()
        .collect()
}

/// 按类型挑出矩阵行对象
pub fn entities_of_kind(entities: &[AuditEntity], kind: EntityKind) -> Vec<AuditEntity> {
    entities.iter().filter(|e| e.kind == kind).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::incident::{StoppageDetails, StoppageIncident};
    use crate::domain::types::{IncidentStatus, InspectionKind};
    use chrono::{DateTime, TimeZone, Utc};

    fn plant() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// 本地时间 → UTC
    fn local(y: i32, m: u32, day: u32, h: u32) -> DateTime<Utc> {
        plant()
            .with_ymd_and_hms(y, m, day, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn record(
        id: &str,
        kind: InspectionKind,
        line: &str,
        user: &str,
        name: &str,
        at: DateTime<Utc>,
        items: u32,
        ng: u32,
    ) -> LogEntry {
        LogEntry::Inspection(InspectionRecord {
            record_id: id.to_string(),
            kind,
            line: line.to_string(),
            performed_by: user.to_string(),
            performer_name: name.to_string(),
            performer_role: Some("Líder".to_string()),
            shift: Some("1".to_string()),
            maintenance_target: None,
            submitted_at: at,
            items_count: items,
            ng_count: ng,
            observation: None,
        })
    }

    fn stoppage(line: &str, at: DateTime<Utc>) -> LogEntry {
        LogEntry::Stoppage(StoppageIncident {
            incident_id: "S1".to_string(),
            created_at: at,
            line: line.to_string(),
            reported_by: "1001".to_string(),
            reporter_name: "Ana".to_string(),
            reporter_role: None,
            responsible_sector: "MAINTENANCE".to_string(),
            narrative: "belt jam".to_string(),
            details: StoppageDetails::default(),
            status: IncidentStatus::WaitingJustification,
            justification: None,
            justified_by: None,
            justified_at: None,
            signed_document_ref: None,
        })
    }

    fn week5() -> AuditWindow {
        iso_week::resolve_window("2024-W05").unwrap()
    }

    #[test]
    fn test_line_matrix_ok_and_ng_with_submitters() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let entries = vec![
            record("R1", InspectionKind::Production, "LINE-01", "1001", "Ana Lima", local(2024, 1, 31, 9), 5, 0),
            record("R2", InspectionKind::Production, "LINE-01", "1002", "Bruno Reis", local(2024, 2, 1, 9), 5, 1),
            record("R3", InspectionKind::Production, "LINE-01", "1003", "Ana Costa", local(2024, 2, 1, 14), 5, 0),
            record("R4", InspectionKind::Production, "LINE-01", "1002", "Bruno Reis", local(2024, 2, 1, 15), 5, 0),
            stoppage("LINE-01", local(2024, 2, 1, 10)),
        ];
        let matrix = builder.build(
            MatrixKind::Lines,
            &[AuditEntity::line("LINE-01")],
            &week5(),
            &entries,
            d(2024, 2, 10),
        );

        let wed = matrix.cell("LINE-01", d(2024, 1, 31)).unwrap();
        assert_eq!(wed.status, CellStatus::Ok);
        assert_eq!(wed.record_ids, vec!["R1".to_string()]);

        let thu = matrix.cell("LINE-01", d(2024, 2, 1)).unwrap();
        assert_eq!(thu.status, CellStatus::Ng);
        assert_eq!(thu.detail.as_deref(), Some("Bruno / Ana"));
        assert_eq!(matrix.record_ids_for("LINE-01", d(2024, 2, 1)).len(), 3);
    }

    #[test]
    fn test_pending_vs_missed_cutoff() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let matrix = builder.build(
            MatrixKind::Lines,
            &[AuditEntity::line("LINE-02")],
            &week5(),
            &[],
            d(2024, 1, 31),
        );
        let row = matrix.row("LINE-02").unwrap();
        let statuses: Vec<CellStatus> = row.cells.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CellStatus::Ng,
                CellStatus::Ng,
                CellStatus::Pending,
                CellStatus::Pending,
                CellStatus::Pending,
                CellStatus::Pending,
            ]
        );
        assert!(row.cells[0].is_missed());
        let summary = row.summary();
        assert_eq!((summary.ok, summary.ng, summary.pending), (0, 2, 4));
    }

    #[test]
    fn test_maintenance_detail_is_failing_station() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let mut entries = vec![
            record("M1", InspectionKind::Maintenance, "SMT-01", "2001", "Carlos", local(2024, 1, 29, 8), 8, 0),
            record("M2", InspectionKind::Maintenance, "SMT-01", "2001", "Carlos", local(2024, 1, 29, 16), 8, 2),
            record("P1", InspectionKind::Production, "SMT-01", "1001", "Ana", local(2024, 1, 29, 9), 5, 3),
        ];
        if let LogEntry::Inspection(r) = &mut entries[1] {
            r.maintenance_target = Some("FORNO-REFLOW".to_string());
        }
        let matrix = builder.build(
            MatrixKind::Maintenance,
            &[AuditEntity::station("SMT-01")],
            &week5(),
            &entries,
            d(2024, 1, 29),
        );
        let cell = matrix.cell("SMT-01", d(2024, 1, 29)).unwrap();
        assert_eq!(cell.status, CellStatus::Ng);
        assert_eq!(cell.detail.as_deref(), Some("FORNO-REFLOW"));
        assert_eq!(cell.record_ids, vec!["M1".to_string(), "M2".to_string()]);
    }

    #[test]
    fn test_leader_matrix_matches_performer_and_shift() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let mut entries = vec![
            record("R1", InspectionKind::Production, "LINE-01", "1001", "Ana", local(2024, 1, 30, 9), 5, 0),
            record("R2", InspectionKind::Production, "LINE-02", "1002", "Bruno", local(2024, 1, 30, 9), 5, 0),
        ];
        if let LogEntry::Inspection(r) = &mut entries[1] {
            r.shift = Some("2".to_string());
        }
        let leaders = vec![
            AuditEntity::leader("1001", "Ana", "Líder", Some("1")),
            AuditEntity::leader("1002", "Bruno", "Líder", Some("2")),
        ];
        let window = week5().with_shift(ShiftFilter::Shift("1".to_string()));
        let matrix = builder.build(MatrixKind::Leaders, &leaders, &window, &entries, d(2024, 2, 1));

        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(
            matrix.cell("1001", d(2024, 1, 30)).unwrap().status,
            CellStatus::Ok
        );
        assert!(matrix.row("1002").is_none());
    }

    #[test]
    fn test_shift_filter_discards_records() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let entries = vec![record(
            "R1",
            InspectionKind::Production,
            "LINE-01",
            "1001",
            "Ana",
            local(2024, 1, 30, 9),
            5,
            1,
        )];
        let window = week5().with_shift(ShiftFilter::Shift("3".to_string()));
        let matrix = builder.build(
            MatrixKind::Lines,
            &[AuditEntity::line("LINE-01")],
            &window,
            &entries,
            d(2024, 1, 29),
        );
        let cell = matrix.cell("LINE-01", d(2024, 1, 30)).unwrap();
        assert_eq!(cell.status, CellStatus::Pending);
        assert!(cell.record_ids.is_empty());
    }

    #[test]
    fn test_local_day_boundary() {
        // 本地 2024-01-30 23:30 = UTC 01-31 03:30，应归入 30 日
        let builder = ComplianceMatrixBuilder::new(plant());
        let at = plant()
            .with_ymd_and_hms(2024, 1, 30, 23, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        let entries = vec![record("R1", InspectionKind::Production, "LINE-01", "1001", "Ana", at, 5, 0)];
        let matrix = builder.build(
            MatrixKind::Lines,
            &[AuditEntity::line("LINE-01")],
            &week5(),
            &entries,
            d(2024, 2, 5),
        );
        assert_eq!(matrix.cell("LINE-01", d(2024, 1, 30)).unwrap().status, CellStatus::Ok);
        assert_eq!(matrix.cell("LINE-01", d(2024, 1, 31)).unwrap().status, CellStatus::Ng);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let entries = vec![
            record("R1", InspectionKind::Production, "LINE-01", "1001", "Ana", local(2024, 1, 29, 9), 5, 0),
            record("R2", InspectionKind::Production, "LINE-02", "1002", "Bruno", local(2024, 1, 30, 9), 5, 2),
        ];
        let lines = vec![AuditEntity::line("LINE-01"), AuditEntity::line("LINE-02")];
        let a = builder.build(MatrixKind::Lines, &lines, &week5(), &entries, d(2024, 1, 31));
        let b = builder.build(MatrixKind::Lines, &lines, &week5(), &entries, d(2024, 1, 31));
        assert_eq!(a, b);
        assert_eq!(a.rows[0].entity_id, "LINE-01");
        assert_eq!(a.rows[1].entity_id, "LINE-02");
    }

    #[test]
    fn test_invalid_token_yields_empty_matrix() {
        let builder = ComplianceMatrixBuilder::new(plant());
        let matrix = builder.build_for_token(
            MatrixKind::Lines,
            &[AuditEntity::line("LINE-01")],
            "semana-5",
            ShiftFilter::All,
            &[],
            d(2024, 1, 31),
        );
        assert!(matrix.is_empty());
        assert!(matrix.window.is_none());
    }

    #[test]
    fn test_leader_entities_filter() {
        let markers = vec!["lider".to_string(), "líder".to_string(), "supervisor".to_string()];
        let directory = vec![
            AuditEntity::line("LINE-01"),
            AuditEntity::leader("1001", "Ana", "Líder de Linha", Some("1")),
            AuditEntity::leader("1002", "João", "Operador", Some("1")),
            AuditEntity::leader("1003", "Rita", "Supervisor", Some("2")),
        ];
        let leaders = leader_entities(&directory, &markers);
        let ids: Vec<&str> = leaders.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1003"]);
    }
}
