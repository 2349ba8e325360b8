// ==========================================
// 产线点检系统 - 点检记录领域模型
// ==========================================
// 红线: 点检记录一经提交不可修改、不可删除
// 对齐: inspection_record 表
// ==========================================

use crate::domain::types::InspectionKind;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InspectionRecord - 点检提交记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    // ===== 主键 =====
    pub record_id: String,

    // ===== 归属 =====
    pub kind: InspectionKind,               // 生产/维护
    pub line: String,                       // 产线或维护工位 (实体引用)
    pub performed_by: String,               // 执行人工号
    pub performer_name: String,             // 执行人姓名
    pub performer_role: Option<String>,     // 执行人职务 (提交时快照)
    pub shift: Option<String>,              // 执行人班次 (提交时快照)
    pub maintenance_target: Option<String>, // 维护对象设备/工位

    // ===== 结果 =====
    pub submitted_at: DateTime<Utc>, // 提交时间
    pub items_count: u32,            // 检查项数
    pub ng_count: u32,               // 不良项数
    pub observation: Option<String>, // 备注
}

impl InspectionRecord {
    /// 是否包含不良项
    pub fn has_failure(&self) -> bool {
        self.ng_count > 0
    }

    /// 按工厂本地时区换算提交日期
    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        self.submitted_at.with_timezone(&offset).date_naive()
    }

    /// 执行人名（姓名第一个词）
    pub fn performer_first_name(&self) -> &str {
        self.performer_name
            .split_whitespace()
            .next()
            .unwrap_or(self.performer_name.as_str())
    }
}

// ==========================================
// NewInspection - 点检提交入参
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspection {
    pub kind: InspectionKind,
    pub line: String,
    pub performed_by: String,
    pub performer_name: String,
    pub performer_role: Option<String>,
    pub shift: Option<String>,
    pub maintenance_target: Option<String>,
    pub items_count: u32,
    pub ng_count: u32,
    pub observation: Option<String>,
}
