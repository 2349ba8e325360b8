// ==========================================
// 产线点检系统 - API 层
// ==========================================
// 职责: 对外业务接口（校验入参、编排存储与引擎、写 ActionLog）
// ==========================================

pub mod audit_api;
pub mod dashboard_api;
pub mod error;
pub mod inspection_api;
pub mod recorded;
pub mod stoppage_api;

// 重导出核心类型
pub use audit_api::{build_compliance_matrix, resolve_window, AuditApi};
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use inspection_api::InspectionApi;
pub use recorded::Recorded;
pub use stoppage_api::StoppageApi;
