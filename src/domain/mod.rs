// ==========================================
// 产线点检系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod compliance;
pub mod entity;
pub mod incident;
pub mod inspection;
pub mod log_entry;
pub mod types;
pub mod window;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use compliance::{ComplianceCell, ComplianceMatrix, ComplianceRow, MatrixKind, RowSummary};
pub use entity::{Actor, AuditEntity};
pub use incident::{IncidentPatch, NewStoppageIncident, StoppageDetails, StoppageIncident};
pub use inspection::{InspectionRecord, NewInspection};
pub use log_entry::LogEntry;
pub use types::{CellStatus, EntityKind, IncidentStatus, InspectionKind, ShiftFilter};
pub use window::AuditWindow;
