// ==========================================
// 产线点检系统 - 日志存储条目
// ==========================================
// 日志存储按时间顺序返回点检记录与停线单的混合序列
// ==========================================

use crate::domain::incident::StoppageIncident;
use crate::domain::inspection::InspectionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEntry {
    Inspection(InspectionRecord),
    Stoppage(StoppageIncident),
}

impl LogEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Inspection(r) => r.submitted_at,
            LogEntry::Stoppage(i) => i.created_at,
        }
    }

    pub fn as_inspection(&self) -> Option<&InspectionRecord> {
        match self {
            LogEntry::Inspection(r) => Some(r),
            LogEntry::Stoppage(_) => None,
        }
    }

    pub fn as_stoppage(&self) -> Option<&StoppageIncident> {
        match self {
            LogEntry::Inspection(_) => None,
            LogEntry::Stoppage(i) => Some(i),
        }
    }
}

/// 从混合序列中取出点检记录
pub fn inspections(entries: &[LogEntry]) -> impl Iterator<Item = &InspectionRecord> {
    entries.iter().filter_map(LogEntry::as_inspection)
}

/// 从混合序列中取出停线单
pub fn stoppages(entries: &[LogEntry]) -> impl Iterator<Item = &StoppageIncident> {
    entries.iter().filter_map(LogEntry::as_stoppage)
}
