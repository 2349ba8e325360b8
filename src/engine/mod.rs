// ==========================================
// 产线点检系统 - 引擎层
// ==========================================
// 职责: 周换算、合规矩阵、停线单流程、告警汇总
// 红线: Engine 不拼 SQL，不持有共享可变状态
// ==========================================

pub mod alerts;
pub mod authorization;
pub mod compliance;
pub mod iso_week;
pub mod workflow;

// 重导出核心引擎
pub use alerts::AlertAggregator;
pub use authorization::{AuthorizationPredicate, SectorRolePolicy};
pub use compliance::ComplianceMatrixBuilder;
pub use workflow::{StoppageWorkflow, WorkflowError};
