// ==========================================
// 产线点检系统 - 领域类型定义
// ==========================================
// 红线: 状态枚举只允许单向推进
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 点检类型 (Inspection Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionKind {
    Production,  // 生产线班长点检
    Maintenance, // 设备维护点检
}

impl fmt::Display for InspectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl InspectionKind {
    /// 从字符串解析点检类型（未知值按生产点检处理）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "MAINTENANCE" => InspectionKind::Maintenance,
            _ => InspectionKind::Production,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            InspectionKind::Production => "PRODUCTION",
            InspectionKind::Maintenance => "MAINTENANCE",
        }
    }
}

// ==========================================
// 审计对象类型 (Entity Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Line,    // 生产线
    Station, // 维护工位
    Leader,  // 班组长
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Line => write!(f, "LINE"),
            EntityKind::Station => write!(f, "STATION"),
            EntityKind::Leader => write!(f, "LEADER"),
        }
    }
}

// ==========================================
// 单元格状态 (Cell Status)
// ==========================================
// 红线: NG 优先于 OK；过去日期无记录视为 NG（漏检）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellStatus {
    Ok,      // 已点检且无不良
    Ng,      // 存在不良或漏检
    Pending, // 当天/未来尚未提交
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStatus::Ok => write!(f, "OK"),
            CellStatus::Ng => write!(f, "NG"),
            CellStatus::Pending => write!(f, "PENDING"),
        }
    }
}

// ==========================================
// 停线单状态 (Incident Status)
// ==========================================
// 顺序: WaitingJustification < WaitingSignature < Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    WaitingJustification, // 待责任方说明
    WaitingSignature,     // 待上传签字单
    Completed,            // 已闭环
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl IncidentStatus {
    /// 从字符串解析状态
    ///
    /// 历史数据中存在 `OPEN`，等同于待说明
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WAITING_JUSTIFICATION" | "OPEN" => Some(IncidentStatus::WaitingJustification),
            "WAITING_SIGNATURE" => Some(IncidentStatus::WaitingSignature),
            "COMPLETED" => Some(IncidentStatus::Completed),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            IncidentStatus::WaitingJustification => "WAITING_JUSTIFICATION",
            IncidentStatus::WaitingSignature => "WAITING_SIGNATURE",
            IncidentStatus::Completed => "COMPLETED",
        }
    }

    /// 历史数据使用的旧存储值
    pub fn legacy_db_str(&self) -> Option<&'static str> {
        match self {
            IncidentStatus::WaitingJustification => Some("OPEN"),
            _ => None,
        }
    }

    /// 按状态查询/条件更新时匹配的两个存储值（无旧值时两者相同）
    pub fn stored_values(&self) -> [&'static str; 2] {
        [self.to_db_str(), self.legacy_db_str().unwrap_or(self.to_db_str())]
    }

    /// 下一状态（终态返回 None）
    pub fn next(&self) -> Option<IncidentStatus> {
        match self {
            IncidentStatus::WaitingJustification => Some(IncidentStatus::WaitingSignature),
            IncidentStatus::WaitingSignature => Some(IncidentStatus::Completed),
            IncidentStatus::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IncidentStatus::Completed)
    }
}

// ==========================================
// 班次过滤 (Shift Filter)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShiftFilter {
    #[default]
    All,
    Shift(String),
}

impl ShiftFilter {
    /// 从界面参数解析（空串或 "ALL" 表示全部班次）
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("ALL") {
            ShiftFilter::All
        } else {
            ShiftFilter::Shift(trimmed.to_string())
        }
    }

    /// 判断给定班次是否通过过滤
    ///
    /// 未记录班次的数据只在 "全部" 下可见
    pub fn accepts(&self, shift: Option<&str>) -> bool {
        match self {
            ShiftFilter::All => true,
            ShiftFilter::Shift(expected) => shift.map(|s| s.trim() == expected).unwrap_or(false),
        }
    }
}

impl fmt::Display for ShiftFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftFilter::All => write!(f, "ALL"),
            ShiftFilter::Shift(s) => write!(f, "{}", s),
        }
    }
}
