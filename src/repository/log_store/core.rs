use super::queries::{map_incident, map_inspection, INCIDENT_COLUMNS, INSPECTION_COLUMNS};
use super::LogStore;
use crate::db::format_ts;
use crate::domain::entity::{Actor, AuditEntity};
use crate::domain::incident::{IncidentPatch, StoppageIncident};
use crate::domain::inspection::InspectionRecord;
use crate::domain::log_entry::LogEntry;
use crate::domain::types::{IncidentStatus, InspectionKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SqliteLogStore
// ==========================================
pub struct SqliteLogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLogStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 目录维护
    // ==========================================

    /// 新增或更新人员
    pub fn upsert_user(&self, user: &Actor) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO users (user_id, name, role, shift, is_admin)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                role = excluded.role,
                shift = excluded.shift,
                is_admin = excluded.is_admin
            "#,
            params![user.user_id, user.name, user.role, user.shift, user.is_admin],
        )?;
        Ok(())
    }

    /// 按工号查询人员
    pub fn find_user(&self, user_id: &str) -> RepositoryResult<Option<Actor>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT user_id, name, role, shift, is_admin FROM users WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(Actor {
                        user_id: row.get(0)?,
                        name: row.get(1)?,
                        role: row.get(2)?,
                        shift: row.get(3)?,
                        is_admin: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn add_line(&self, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO config_lines (name) VALUES (?1)",
            params![name.trim()],
        )?;
        Ok(())
    }

    pub fn add_station(&self, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO config_stations (name) VALUES (?1)",
            params![name.trim()],
        )?;
        Ok(())
    }

    fn query_incidents(
        conn: &Connection,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<StoppageIncident>> {
        let mut stmt = conn.prepare(&format!("{} {}", INCIDENT_COLUMNS, filter))?;
        let rows = stmt
            .query_map(args, map_incident)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    fn query_inspections(
        conn: &Connection,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<InspectionRecord>> {
        let mut stmt = conn.prepare(&format!("{} {}", INSPECTION_COLUMNS, filter))?;
        let rows = stmt
            .query_map(args, map_inspection)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    fn load_incident(conn: &Connection, incident_id: &str) -> RepositoryResult<Option<StoppageIncident>> {
        let mut found = Self::query_incidents(conn, "WHERE incident_id = ?1", &[&incident_id])?;
        Ok(found.pop())
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn fetch_all(&self) -> RepositoryResult<Vec<LogEntry>> {
        let conn = self.get_conn()?;

        let mut entries: Vec<LogEntry> =
            Self::query_inspections(&conn, "ORDER BY submitted_at ASC, rowid ASC", &[])?
                .into_iter()
                .map(LogEntry::Inspection)
                .collect();
        entries.extend(
            Self::query_incidents(&conn, "ORDER BY created_at ASC, rowid ASC", &[])?
                .into_iter()
                .map(LogEntry::Stoppage),
        );

        // 稳定排序：同一时刻点检记录在前
        entries.sort_by_key(|e| e.timestamp());
        Ok(entries)
    }

    async fn fetch_entities(&self) -> RepositoryResult<Vec<AuditEntity>> {
        let conn = self.get_conn()?;
        let mut entities = Vec::new();

        let mut stmt = conn.prepare("SELECT name FROM config_lines ORDER BY name")?;
        let lines = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        entities.extend(lines.iter().map(|l| AuditEntity::line(l)));

        let mut stmt = conn.prepare("SELECT name FROM config_stations ORDER BY name")?;
        let stations = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        entities.extend(stations.iter().map(|s| AuditEntity::station(s)));

        let mut stmt = conn.prepare("SELECT user_id, name, role, shift FROM users ORDER BY name, user_id")?;
        let users = stmt
            .query_map([], |row| {
                let user_id: String = row.get(0)?;
                let name: String = row.get(1)?;
                let role: String = row.get(2)?;
                let shift: Option<String> = row.get(3)?;
                Ok(AuditEntity::leader(&user_id, &name, &role, shift.as_deref()))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        entities.extend(users);

        Ok(entities)
    }

    async fn find_incident(&self, incident_id: &str) -> RepositoryResult<Option<StoppageIncident>> {
        let conn = self.get_conn()?;
        Self::load_incident(&conn, incident_id)
    }

    async fn list_incidents_by_status(
        &self,
        status: IncidentStatus,
    ) -> RepositoryResult<Vec<StoppageIncident>> {
        let conn = self.get_conn()?;
        let [current, legacy] = status.stored_values();
        Self::query_incidents(
            &conn,
            "WHERE status IN (?1, ?2) ORDER BY created_at DESC, rowid DESC",
            &[&current, &legacy],
        )
    }

    async fn list_inspections(&self, kind: InspectionKind) -> RepositoryResult<Vec<InspectionRecord>> {
        let conn = self.get_conn()?;
        Self::query_inspections(
            &conn,
            "WHERE kind = ?1 ORDER BY submitted_at DESC, rowid DESC",
            &[&kind.to_db_str()],
        )
    }

    async fn insert_inspection(&self, record: &InspectionRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inspection_record (
                record_id, kind, line, performed_by, performer_name, performer_role,
                shift, maintenance_target, submitted_at, items_count, ng_count, observation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                record.record_id,
                record.kind.to_db_str(),
                record.line,
                record.performed_by,
                record.performer_name,
                record.performer_role,
                record.shift,
                record.maintenance_target,
                format_ts(&record.submitted_at),
                record.items_count,
                record.ng_count,
                record.observation,
            ],
        )?;
        Ok(())
    }

    async fn insert_incident(&self, incident: &StoppageIncident) -> RepositoryResult<()> {
        let details_json = serde_json::to_string(&incident.details)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO stoppage_incident (
                incident_id, created_at, line, reported_by, reporter_name, reporter_role,
                responsible_sector, narrative, details_json, status,
                justification, justified_by, justified_at, signed_document_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                incident.incident_id,
                format_ts(&incident.created_at),
                incident.line,
                incident.reported_by,
                incident.reporter_name,
                incident.reporter_role,
                incident.responsible_sector,
                incident.narrative,
                details_json,
                incident.status.to_db_str(),
                incident.justification,
                incident.justified_by,
                incident.justified_at.as_ref().map(format_ts),
                incident.signed_document_ref,
            ],
        )?;
        Ok(())
    }

    async fn update_incident_status(
        &self,
        incident_id: &str,
        patch: &IncidentPatch,
    ) -> RepositoryResult<StoppageIncident> {
        let conn = self.get_conn()?;
        let [expected, expected_legacy] = patch.expected_status().stored_values();
        let target = patch.target_status().to_db_str();

        // 条件更新: 只有当前状态仍为 expected（含旧存储值）时才写入
        let rows_affected = match patch {
            IncidentPatch::Justify {
                justification,
                justified_by,
                justified_at,
            } => conn.execute(
                r#"
                UPDATE stoppage_incident
                SET status = ?1, justification = ?2, justified_by = ?3, justified_at = ?4
                WHERE incident_id = ?5 AND status IN (?6, ?7)
                "#,
                params![
                    target,
                    justification,
                    justified_by,
                    format_ts(justified_at),
                    incident_id,
                    expected,
                    expected_legacy
                ],
            )?,
            IncidentPatch::AttachSignedDocument { document_ref } => conn.execute(
                r#"
                UPDATE stoppage_incident
                SET status = ?1, signed_document_ref = ?2
                WHERE incident_id = ?3 AND status IN (?4, ?5)
                "#,
                params![target, document_ref, incident_id, expected, expected_legacy],
            )?,
        };

        if rows_affected == 0 {
            let actual: Option<String> = conn
                .query_row(
                    "SELECT status FROM stoppage_incident WHERE incident_id = ?1",
                    params![incident_id],
                    |row| row.get(0),
                )
                .optional()?;

            return Err(match actual {
                None => RepositoryError::NotFound {
                    entity: "StoppageIncident".to_string(),
                    id: incident_id.to_string(),
                },
                Some(actual) => RepositoryError::InvalidStateTransition {
                    id: incident_id.to_string(),
                    from: actual,
                    to: target.to_string(),
                },
            });
        }

        Self::load_incident(&conn, incident_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "StoppageIncident".to_string(),
            id: incident_id.to_string(),
        })
    }
}
