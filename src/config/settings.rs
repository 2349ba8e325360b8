// ==========================================
// 产线点检系统 - 配置快照
// ==========================================

use crate::config::audit_config_trait::AuditConfigReader;
use crate::config::config_manager::{defaults, parse_sector_aliases};
use crate::repository::error::RepositoryResult;
use chrono::FixedOffset;
use serde::Serialize;

/// 一次请求内使用的不可变配置
#[derive(Debug, Clone, Serialize)]
pub struct AuditSettings {
    pub leadership_roles: Vec<String>,
    pub leader_role_markers: Vec<String>,
    #[serde(serialize_with = "serialize_offset")]
    pub plant_offset: FixedOffset,
    pub stoppage_sectors: Vec<String>,
    pub sector_aliases: Vec<(String, String)>,
}

impl AuditSettings {
    pub async fn load(reader: &dyn AuditConfigReader) -> RepositoryResult<Self> {
        Ok(Self {
            leadership_roles: reader.get_leadership_roles().await?,
            leader_role_markers: reader.get_leader_role_markers().await?,
            plant_offset: reader.get_plant_offset().await?,
            stoppage_sectors: reader.get_stoppage_sectors().await?,
            sector_aliases: reader.get_sector_aliases().await?,
        })
    }
}

impl Default for AuditSettings {
    fn default() -> Self {
        let csv = |raw: &str| raw.split(',').map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            leadership_roles: csv(defaults::LEADERSHIP_ROLES),
            leader_role_markers: csv(defaults::LEADER_ROLE_MARKERS),
            plant_offset: defaults::plant_offset(),
            stoppage_sectors: csv(defaults::STOPPAGE_SECTORS),
            sector_aliases: parse_sector_aliases(defaults::SECTOR_ALIASES),
        }
    }
}

fn serialize_offset<S: serde::Serializer>(offset: &FixedOffset, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i32(offset.local_minus_utc() / 60)
}
