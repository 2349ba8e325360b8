// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use line_audit::domain::incident::{NewStoppageIncident, StoppageDetails};
use line_audit::domain::inspection::InspectionRecord;
use line_audit::domain::types::InspectionKind;

/// 工厂本地时刻 → UTC
pub fn local_ts(offset: FixedOffset, day: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    offset
        .from_local_datetime(&day.and_hms_opt(hour, minute, 0).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// InspectionRecord 构建器
// ==========================================

pub struct InspectionBuilder {
    record_id: String,
    kind: InspectionKind,
    line: String,
    performed_by: String,
    performer_name: String,
    performer_role: Option<String>,
    shift: Option<String>,
    maintenance_target: Option<String>,
    submitted_at: DateTime<Utc>,
    items_count: u32,
    ng_count: u32,
}

impl InspectionBuilder {
    pub fn new(record_id: &str) -> Self {
        Self {
            record_id: record_id.to_string(),
            kind: InspectionKind::Production,
            line: "LINE-01".to_string(),
            performed_by: "1001".to_string(),
            performer_name: "Ana Lima".to_string(),
            performer_role: Some("Líder de Produção".to_string()),
            shift: Some("1".to_string()),
            maintenance_target: None,
            submitted_at: Utc::now(),
            items_count: 5,
            ng_count: 0,
        }
    }

    pub fn maintenance(mut self, target: &str) -> Self {
        self.kind = InspectionKind::Maintenance;
        self.maintenance_target = Some(target.to_string());
        self
    }

    pub fn line(mut self, line: &str) -> Self {
        self.line = line.to_string();
        self
    }

    pub fn performer(mut self, user_id: &str, name: &str) -> Self {
        self.performed_by = user_id.to_string();
        self.performer_name = name.to_string();
        self
    }

    pub fn shift(mut self, shift: &str) -> Self {
        self.shift = Some(shift.to_string());
        self
    }

    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.submitted_at = ts;
        self
    }

    pub fn failures(mut self, ng: u32, of: u32) -> Self {
        self.ng_count = ng;
        self.items_count = of;
        self
    }

    pub fn build(self) -> InspectionRecord {
        InspectionRecord {
            record_id: self.record_id,
            kind: self.kind,
            line: self.line,
            performed_by: self.performed_by,
            performer_name: self.performer_name,
            performer_role: self.performer_role,
            shift: self.shift,
            maintenance_target: self.maintenance_target,
            submitted_at: self.submitted_at,
            items_count: self.items_count,
            ng_count: self.ng_count,
            observation: None,
        }
    }
}

// ==========================================
// 停线单草稿构建器
// ==========================================

pub struct IncidentDraftBuilder {
    line: String,
    reported_by: String,
    reporter_name: String,
    responsible_sector: String,
    narrative: String,
    start_time: String,
    end_time: String,
}

impl IncidentDraftBuilder {
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            reported_by: "2001".to_string(),
            reporter_name: "Carla Souza".to_string(),
            responsible_sector: "MAINTENANCE".to_string(),
            narrative: "belt jam".to_string(),
            start_time: "08:10".to_string(),
            end_time: "08:55".to_string(),
        }
    }

    pub fn sector(mut self, sector: &str) -> Self {
        self.responsible_sector = sector.to_string();
        self
    }

    pub fn narrative(mut self, narrative: &str) -> Self {
        self.narrative = narrative.to_string();
        self
    }

    pub fn times(mut self, start: &str, end: &str) -> Self {
        self.start_time = start.to_string();
        self.end_time = end.to_string();
        self
    }

    pub fn build(self) -> NewStoppageIncident {
        NewStoppageIncident {
            line: self.line,
            reported_by: self.reported_by,
            reporter_name: self.reporter_name,
            reporter_role: Some("Operador".to_string()),
            responsible_sector: self.responsible_sector,
            narrative: self.narrative,
            details: StoppageDetails {
                model: "TV-55".to_string(),
                start_time: self.start_time,
                end_time: self.end_time,
                ..StoppageDetails::default()
            },
        }
    }
}
