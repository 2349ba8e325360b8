// ==========================================
// 产线点检系统 - 合规矩阵 (派生数据，不落库)
// ==========================================

use crate::domain::types::{CellStatus, EntityKind, InspectionKind};
use crate::domain::window::AuditWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// MatrixKind - 矩阵类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatrixKind {
    Lines,       // 产线 × 日 (生产点检)
    Maintenance, // 工位 × 日 (维护点检)
    Leaders,     // 班组长 × 日 (生产点检，按执行人归属)
}

impl MatrixKind {
    /// 参与该矩阵的点检类型
    pub fn inspection_kind(&self) -> InspectionKind {
        match self {
            MatrixKind::Lines | MatrixKind::Leaders => InspectionKind::Production,
            MatrixKind::Maintenance => InspectionKind::Maintenance,
        }
    }

    /// 矩阵行对应的审计对象类型
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            MatrixKind::Lines => EntityKind::Line,
            MatrixKind::Maintenance => EntityKind::Station,
            MatrixKind::Leaders => EntityKind::Leader,
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Lines => write!(f, "LINES"),
            MatrixKind::Maintenance => write!(f, "MAINTENANCE"),
            MatrixKind::Leaders => write!(f, "LEADERS"),
        }
    }
}

// ==========================================
// ComplianceCell - 对象在某一天的合规状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCell {
    pub date: NaiveDate,
    pub status: CellStatus,
    pub record_ids: Vec<String>, // 参与判定的点检记录
    pub detail: Option<String>,  // NG 说明 (执行人 / 故障工位)
}

impl ComplianceCell {
    /// 过去日期无任何记录（漏检）
    pub fn is_missed(&self) -> bool {
        self.status == CellStatus::Ng && self.record_ids.is_empty()
    }
}

// ==========================================
// ComplianceRow - 矩阵中的一行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRow {
    pub entity_id: String,
    pub entity_name: String,
    pub cells: Vec<ComplianceCell>, // 按日期升序
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSummary {
    pub ok: usize,
    pub ng: usize,
    pub pending: usize,
}

impl ComplianceRow {
    pub fn cell_on(&self, date: NaiveDate) -> Option<&ComplianceCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    pub fn summary(&self) -> RowSummary {
        self.cells
            .iter()
            .fold(RowSummary::default(), |mut acc, cell| {
                match cell.status {
                    CellStatus::Ok => acc.ok += 1,
                    CellStatus::Ng => acc.ng += 1,
                    CellStatus::Pending => acc.pending += 1,
                }
                acc
            })
    }
}

// ==========================================
// ComplianceMatrix - 合规矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceMatrix {
    pub kind: MatrixKind,
    pub window: Option<AuditWindow>, // None 表示尚未选择周
    pub rows: Vec<ComplianceRow>,
}

impl ComplianceMatrix {
    /// 空矩阵（周标识无效时返回）
    pub fn empty(kind: MatrixKind) -> Self {
        Self {
            kind,
            window: None,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, entity_id: &str) -> Option<&ComplianceRow> {
        self.rows.iter().find(|r| r.entity_id == entity_id)
    }

    pub fn cell(&self, entity_id: &str, date: NaiveDate) -> Option<&ComplianceCell> {
        self.row(entity_id).and_then(|r| r.cell_on(date))
    }

    /// 单元格对应的点检记录 ID（用于打开明细）
    pub fn record_ids_for(&self, entity_id: &str, date: NaiveDate) -> &[String] {
        self.cell(entity_id, date)
            .map(|c| c.record_ids.as_slice())
            .unwrap_or(&[])
    }
}
