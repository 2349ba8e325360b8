// ==========================================
// 产线点检系统 - 审计窗口
// ==========================================
// 周一至周六共 6 天，周日不在审计范围内
// ==========================================

use crate::domain::types::ShiftFilter;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 审计窗口天数（周一..周六）
pub const WINDOW_DAYS: i64 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWindow {
    pub iso_year: i32,
    pub iso_week: u32,
    pub monday: NaiveDate,
    pub shift: ShiftFilter,
}

impl AuditWindow {
    pub fn new(iso_year: i32, iso_week: u32, monday: NaiveDate) -> Self {
        Self {
            iso_year,
            iso_week,
            monday,
            shift: ShiftFilter::All,
        }
    }

    pub fn with_shift(mut self, shift: ShiftFilter) -> Self {
        self.shift = shift;
        self
    }

    pub fn saturday(&self) -> NaiveDate {
        self.monday + Duration::days(WINDOW_DAYS - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date <= self.saturday()
    }

    /// 周标识 "YYYY-Www"
    pub fn token(&self) -> String {
        format!("{}-W{:02}", self.iso_year, self.iso_week)
    }
}
