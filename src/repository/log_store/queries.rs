use crate::domain::incident::{StoppageDetails, StoppageIncident};
use crate::domain::inspection::InspectionRecord;
use crate::domain::types::{IncidentStatus, InspectionKind};
use crate::repository::error::RepositoryError;
use crate::repository::read_ts;
use rusqlite::types::Type;
use rusqlite::{Result as SqliteResult, Row};

pub(super) const INSPECTION_COLUMNS: &str = r#"
    SELECT record_id, kind, line, performed_by, performer_name, performer_role,
           shift, maintenance_target, submitted_at, items_count, ng_count, observation
    FROM inspection_record
"#;

pub(super) const INCIDENT_COLUMNS: &str = r#"
    SELECT incident_id, created_at, line, reported_by, reporter_name, reporter_role,
           responsible_sector, narrative, details_json, status,
           justification, justified_by, justified_at, signed_document_ref
    FROM stoppage_incident
"#;

/// 将数据库行映射为 InspectionRecord
pub(super) fn map_inspection(row: &Row) -> SqliteResult<InspectionRecord> {
    let kind: String = row.get(1)?;

    Ok(InspectionRecord {
        record_id: row.get(0)?,
        kind: InspectionKind::from_str(&kind),
        line: row.get(2)?,
        performed_by: row.get(3)?,
        performer_name: row.get(4)?,
        performer_role: row.get(5)?,
        shift: row.get(6)?,
        maintenance_target: row.get(7)?,
        submitted_at: read_ts(row, 8)?,
        items_count: row.get(9)?,
        ng_count: row.get(10)?,
        observation: row.get(11)?,
    })
}

/// 将数据库行映射为 StoppageIncident
pub(super) fn map_incident(row: &Row) -> SqliteResult<StoppageIncident> {
    let details_json: String = row.get(8)?;
    let details: StoppageDetails = serde_json::from_str(&details_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    let status_str: String = row.get(9)?;
    let status = IncidentStatus::from_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            Type::Text,
            Box::new(RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知状态: {}", status_str),
            }),
        )
    })?;

    let justified_at: Option<String> = row.get(12)?;
    let justified_at = match justified_at {
        Some(_) => Some(read_ts(row, 12)?),
        None => None,
    };

    Ok(StoppageIncident {
        incident_id: row.get(0)?,
        created_at: read_ts(row, 1)?,
        line: row.get(2)?,
        reported_by: row.get(3)?,
        reporter_name: row.get(4)?,
        reporter_role: row.get(5)?,
        responsible_sector: row.get(6)?,
        narrative: row.get(7)?,
        details,
        status,
        justification: row.get(10)?,
        justified_by: row.get(11)?,
        justified_at,
        signed_document_ref: row.get(13)?,
    })
}
