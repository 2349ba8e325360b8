// ==========================================
// 产线点检系统 - 审计对象与操作人
// ==========================================

use crate::domain::types::EntityKind;
use serde::{Deserialize, Serialize};

// ==========================================
// AuditEntity - 审计对象（产线/工位/班组长）
// ==========================================
// 说明: 用户目录中的人员统一以 LEADER 候选返回，
//       是否进入班组长矩阵由角色谓词决定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntity {
    pub entity_id: String,     // 产线名 / 工位名 / 工号
    pub name: String,          // 显示名称
    pub kind: EntityKind,      // 对象类型
    pub shift: Option<String>, // 班次 (仅人员)
    pub role: Option<String>,  // 职务 (仅人员)
}

impl AuditEntity {
    /// 生产线
    pub fn line(id: &str) -> Self {
        Self {
            entity_id: id.to_string(),
            name: id.to_string(),
            kind: EntityKind::Line,
            shift: None,
            role: None,
        }
    }

    /// 维护工位
    pub fn station(id: &str) -> Self {
        Self {
            entity_id: id.to_string(),
            name: id.to_string(),
            kind: EntityKind::Station,
            shift: None,
            role: None,
        }
    }

    /// 人员（班组长候选）
    pub fn leader(id: &str, name: &str, role: &str, shift: Option<&str>) -> Self {
        Self {
            entity_id: id.to_string(),
            name: name.to_string(),
            kind: EntityKind::Leader,
            shift: shift.map(|s| s.to_string()),
            role: Some(role.to_string()),
        }
    }

    /// 职务是否包含任一标记（大小写不敏感）
    pub fn role_matches_any(&self, markers: &[String]) -> bool {
        let role = match &self.role {
            Some(r) => r.to_lowercase(),
            None => return false,
        };
        markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .any(|m| role.contains(&m))
    }
}

// ==========================================
// Actor - 当前操作人
// ==========================================
// 由登录会话提供，引擎只消费不校验身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub name: String,
    pub role: String,
    pub shift: Option<String>,
    pub is_admin: bool, // 超级管理员
}

impl Actor {
    pub fn new(user_id: &str, name: &str, role: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            shift: None,
            is_admin: false,
        }
    }

    pub fn with_shift(mut self, shift: &str) -> Self {
        self.shift = Some(shift.to_string());
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_markers_case_insensitive() {
        let markers = vec!["lider".to_string(), "líder".to_string(), "supervisor".to_string()];
        let leader = AuditEntity::leader("1001", "Ana", "LÍDER DE PRODUÇÃO", Some("1"));
        let operator = AuditEntity::leader("1002", "João", "Operador", Some("1"));
        assert!(leader.role_matches_any(&markers));
        assert!(!operator.role_matches_any(&markers));
        assert!(!AuditEntity::line("LINE-01").role_matches_any(&markers));
    }
}
