// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::FixedOffset;
use line_audit::config::AuditConfigReader;
use line_audit::repository::RepositoryResult;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub leadership_roles: Vec<String>,
    pub leader_role_markers: Vec<String>,
    pub offset_minutes: i32,
    pub stoppage_sectors: Vec<String>,
    pub sector_aliases: Vec<(String, String)>,
}

impl MockConfig {
    /// 与出厂默认一致（UTC-04:00）
    pub fn default() -> Self {
        Self {
            leadership_roles: ["SUPERVISOR", "COORDENADOR", "DIRETOR", "ADMIN", "GERENTE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            leader_role_markers: ["lider", "líder", "supervisor", "coordenador"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            offset_minutes: -240,
            stoppage_sectors: ["GQ", "PRODUÇÃO", "MANUTENÇÃO", "MAINTENANCE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sector_aliases: vec![("MAINTENANCE".to_string(), "MANUTENÇÃO".to_string())],
        }
    }

    /// UTC 时区配置
    pub fn utc() -> Self {
        let mut config = Self::default();
        config.offset_minutes = 0;
        config
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_minutes * 60).unwrap()
    }
}

#[async_trait]
impl AuditConfigReader for MockConfig {
    async fn get_leadership_roles(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.leadership_roles.clone())
    }

    async fn get_leader_role_markers(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.leader_role_markers.clone())
    }

    async fn get_plant_offset(&self) -> RepositoryResult<FixedOffset> {
        Ok(self.offset())
    }

    async fn get_stoppage_sectors(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.stoppage_sectors.clone())
    }

    async fn get_sector_aliases(&self) -> RepositoryResult<Vec<(String, String)>> {
        Ok(self.sector_aliases.clone())
    }
}
