// ==========================================
// 产线点检系统 - 停线单领域模型
// ==========================================
// 红线: 状态单向推进 (待说明 → 待签字 → 已闭环)，不提供删除
// 红线: 只有状态相关字段可变，且只能通过流程迁移修改
// 对齐: stoppage_incident 表
// ==========================================

use crate::domain::types::IncidentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// StoppageDetails - 停线现场信息
// ==========================================
// 与报表一一对应，引擎只使用 start_time 做必填校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoppageDetails {
    pub model: String,           // 机型
    pub client: String,          // 客户
    pub start_time: String,      // 开始时间 HH:MM
    pub end_time: String,        // 结束时间 HH:MM
    pub total_time: String,      // 停线时长 HH:MM (派生)
    pub phase: String,           // 工段
    pub production_loss: String, // 产量损失
    pub standard_time: String,   // 标准工时
    pub people_stopped: String,  // 停工人数
    pub station_start: String,   // 停线工位 (起)
    pub station_end: String,     // 停线工位 (止)
}

impl StoppageDetails {
    /// 由起止时间派生停线时长
    ///
    /// 结束早于开始时视为跨零点；任一时间缺失或格式错误返回空串
    pub fn derive_total_time(start: &str, end: &str) -> String {
        match (parse_hh_mm(start), parse_hh_mm(end)) {
            (Some(s), Some(e)) => {
                let mut diff = e - s;
                if diff < 0 {
                    diff += 24 * 60;
                }
                format!("{:02}:{:02}", diff / 60, diff % 60)
            }
            _ => String::new(),
        }
    }
}

fn parse_hh_mm(raw: &str) -> Option<i32> {
    let (h, m) = raw.trim().split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some(h * 60 + m)
}

// ==========================================
// StoppageIncident - 停线单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoppageIncident {
    // ===== 主键与不可变字段 =====
    pub incident_id: String,
    pub created_at: DateTime<Utc>,
    pub line: String,
    pub reported_by: String,           // 报告人工号
    pub reporter_name: String,         // 报告人姓名
    pub reporter_role: Option<String>, // 报告人职务
    pub responsible_sector: String,    // 责任部门
    pub narrative: String,             // 停线原因描述
    pub details: StoppageDetails,

    // ===== 流程字段 =====
    pub status: IncidentStatus,
    pub justification: Option<String>,
    pub justified_by: Option<String>,
    pub justified_at: Option<DateTime<Utc>>,
    pub signed_document_ref: Option<String>,
}

// ==========================================
// NewStoppageIncident - 新建停线单入参
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStoppageIncident {
    pub line: String,
    pub reported_by: String,
    pub reporter_name: String,
    pub reporter_role: Option<String>,
    pub responsible_sector: String,
    pub narrative: String,
    pub details: StoppageDetails,
}

// ==========================================
// IncidentPatch - 流程迁移补丁
// ==========================================
// 每个补丁对应唯一的起始状态与目标状态，仓储据此做 CAS 写入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IncidentPatch {
    Justify {
        justification: String,
        justified_by: String,
        justified_at: DateTime<Utc>,
    },
    AttachSignedDocument {
        document_ref: String,
    },
}

impl IncidentPatch {
    /// 补丁要求的当前状态
    pub fn expected_status(&self) -> IncidentStatus {
        match self {
            IncidentPatch::Justify { .. } => IncidentStatus::WaitingJustification,
            IncidentPatch::AttachSignedDocument { .. } => IncidentStatus::WaitingSignature,
        }
    }

    /// 补丁写入后的状态
    pub fn target_status(&self) -> IncidentStatus {
        match self {
            IncidentPatch::Justify { .. } => IncidentStatus::WaitingSignature,
            IncidentPatch::AttachSignedDocument { .. } => IncidentStatus::Completed,
        }
    }

    /// 在内存副本上应用补丁
    pub fn apply_to(&self, incident: &mut StoppageIncident) {
        match self {
            IncidentPatch::Justify {
                justification,
                justified_by,
                justified_at,
            } => {
                incident.justification = Some(justification.clone());
                incident.justified_by = Some(justified_by.clone());
                incident.justified_at = Some(*justified_at);
            }
            IncidentPatch::AttachSignedDocument { document_ref } => {
                incident.signed_document_ref = Some(document_ref.clone());
            }
        }
        incident.status = self.target_status();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_time_wraps_midnight() {
        assert_eq!(StoppageDetails::derive_total_time("08:15", "09:45"), "01:30");
        assert_eq!(StoppageDetails::derive_total_time("23:50", "00:20"), "00:30");
        assert_eq!(StoppageDetails::derive_total_time("08:00", ""), "");
        assert_eq!(StoppageDetails::derive_total_time("25:00", "01:00"), "");
    }

    #[test]
    fn test_patch_status_pairs() {
        let justify = IncidentPatch::Justify {
            justification: "x".to_string(),
            justified_by: "y".to_string(),
            justified_at: Utc::now(),
        };
        assert_eq!(justify.expected_status(), IncidentStatus::WaitingJustification);
        assert_eq!(justify.target_status(), IncidentStatus::WaitingSignature);

        let attach = IncidentPatch::AttachSignedDocument {
            document_ref: "doc".to_string(),
        };
        assert_eq!(attach.expected_status(), IncidentStatus::WaitingSignature);
        assert_eq!(attach.target_status(), IncidentStatus::Completed);
    }
}
