// ==========================================
// 产线点检系统 - 操作日志数据仓储
// ==========================================
// 红线: 所有流程写入必须记录
// 对齐: action_log 表
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;
