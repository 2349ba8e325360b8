// ==========================================
// 产线点检系统 - 核心库
// ==========================================
// 功能: 点检合规追踪 + 停线单审批流程
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CellStatus, EntityKind, IncidentStatus, InspectionKind, ShiftFilter};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Actor, AuditEntity, AuditWindow, ComplianceCell, ComplianceMatrix,
    InspectionRecord, LogEntry, MatrixKind, StoppageIncident,
};

// 引擎
pub use engine::{
    AlertAggregator, AuthorizationPredicate, ComplianceMatrixBuilder, SectorRolePolicy,
    StoppageWorkflow, WorkflowError,
};

// API
pub use api::{ApiError, AuditApi, DashboardApi, InspectionApi, StoppageApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线点检系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
