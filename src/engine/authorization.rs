// ==========================================
// 产线点检系统 - 停线单授权谓词
// ==========================================
// 职责: 判断操作人是否有权对停线单做责任方说明
// 规则 (任一满足即通过):
//   1. 职务属于配置的管理层角色 (精确匹配，忽略大小写)
//   2. 职务文本包含停线单的责任部门或其别名 (忽略大小写)
//   3. 操作人为超级管理员
// ==========================================

use crate::config::AuditSettings;
use crate::domain::entity::Actor;
use crate::domain::incident::StoppageIncident;

/// 授权谓词
pub trait AuthorizationPredicate: Send + Sync {
    fn is_authorized_for(&self, actor: &Actor, incident: &StoppageIncident) -> bool;
}

// ==========================================
// SectorRolePolicy - 默认授权策略
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SectorRolePolicy {
    leadership_roles: Vec<String>,         // 已规范化为大写
    sector_aliases: Vec<(String, String)>, // 已规范化为大写
}

impl SectorRolePolicy {
    pub fn new(leadership_roles: &[String]) -> Self {
        Self {
            leadership_roles: leadership_roles
                .iter()
                .map(|r| r.trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .collect(),
            sector_aliases: Vec::new(),
        }
    }

    /// 部门别名，如 MAINTENANCE=MANUTENÇÃO
    pub fn with_sector_aliases(mut self, aliases: &[(String, String)]) -> Self {
        self.sector_aliases = aliases
            .iter()
            .map(|(a, b)| (a.trim().to_uppercase(), b.trim().to_uppercase()))
            .filter(|(a, b)| !a.is_empty() && !b.is_empty())
            .collect();
        self
    }

    pub fn from_settings(settings: &AuditSettings) -> Self {
        Self::new(&settings.leadership_roles).with_sector_aliases(&settings.sector_aliases)
    }

    fn holds_leadership_role(&self, role: &str) -> bool {
        let role = role.trim().to_uppercase();
        self.leadership_roles.iter().any(|r| *r == role)
    }

    /// 部门本身及其全部别名（大写）
    fn sector_names(&self, sector: &str) -> Vec<String> {
        let mut names = vec![sector.to_string()];
        for (a, b) in &self.sector_aliases {
            let other = if a == sector {
                b
            } else if b == sector {
                a
            } else {
                continue;
            };
            if !names.contains(other) {
                names.push(other.clone());
            }
        }
        names
    }
}

impl AuthorizationPredicate for SectorRolePolicy {
    fn is_authorized_for(&self, actor: &Actor, incident: &StoppageIncident) -> bool {
        if actor.is_admin || self.holds_leadership_role(&actor.role) {
            return true;
        }

        // 空部门不能让任意职务通过
        let sector = incident.responsible_sector.trim().to_uppercase();
        if sector.is_empty() {
            return false;
        }
        let role = actor.role.to_uppercase();
        self.sector_names(&sector)
            .iter()
            .any(|name| role.contains(name.as_str()))
    }
}
