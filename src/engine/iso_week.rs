// ==========================================
// 产线点检系统 - ISO 周换算
// ==========================================
// 职责: 日期 ↔ ISO-8601 (年, 周) 换算，周标识解析
// 红线: 全系统只允许这一套周算法
// ==========================================

use crate::domain::types::ShiftFilter;
use crate::domain::window::{AuditWindow, WINDOW_DAYS};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

/// 日期所在的 ISO 周
///
/// 以当周周四所在年份为 ISO 年，周数 = ceil(周四的年内序号 / 7)。
/// 周日按一周第 7 天处理。
pub fn date_to_week(date: NaiveDate) -> (i32, u32) {
    let weekday = date.weekday().number_from_monday() as i64;
    let thursday = date + Duration::days(4 - weekday);
    let week = (thursday.ordinal() + 6) / 7;
    (thursday.year(), week)
}

/// ISO 年包含的周数 (52 或 53)
pub fn weeks_in_year(iso_year: i32) -> u32 {
    // 12 月 28 日必定落在该 ISO 年的最后一周
    NaiveDate::from_ymd_opt(iso_year, 12, 28)
        .map(|d| date_to_week(d).1)
        .unwrap_or(52)
}

/// ISO 周对应的审计区间 (周一, 周六)
///
/// 第 1 周为包含 1 月 4 日的那一周。周数超出该年范围返回 None。
pub fn week_to_date_range(iso_year: i32, iso_week: u32) -> Option<(NaiveDate, NaiveDate)> {
    if iso_week == 0 || iso_week > weeks_in_year(iso_year) {
        return None;
    }
    let jan4 = NaiveDate::from_ymd_opt(iso_year, 1, 4)?;
    let week1_monday = jan4 - Duration::days(jan4.weekday().num_days_from_monday() as i64);
    let monday = week1_monday + Duration::weeks(iso_week as i64 - 1);
    Some((monday, monday + Duration::days(WINDOW_DAYS - 1)))
}

/// 从周一起的 6 个审计日
pub fn window_days(monday: NaiveDate) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS)
        .map(|offset| monday + Duration::days(offset))
        .collect()
}

/// 解析周标识 "YYYY-Www"
pub fn parse_week_token(token: &str) -> Option<(i32, u32)> {
    let (year_part, week_part) = token.trim().split_once("-W")?;
    if year_part.len() != 4 || week_part.is_empty() || week_part.len() > 2 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let week: u32 = week_part.parse().ok()?;
    Some((year, week))
}

/// 生成周标识 "YYYY-Www"
pub fn week_token(iso_year: i32, iso_week: u32) -> String {
    format!("{}-W{:02}", iso_year, iso_week)
}

/// 周标识 → 审计窗口（无效标识返回 None，表示 "尚未选择周"）
pub fn resolve_window(token: &str) -> Option<AuditWindow> {
    let resolved = parse_week_token(token)
        .and_then(|(year, week)| week_to_date_range(year, week).map(|(monday, _)| (year, week, monday)));

    match resolved {
        Some((year, week, monday)) => Some(AuditWindow::new(year, week, monday)),
        None => {
            tracing::warn!(token = %token, "周标识无效，按未选择周处理");
            None
        }
    }
}

/// 周标识 + 班次 → 审计窗口
pub fn resolve_window_with_shift(token: &str, shift: ShiftFilter) -> Option<AuditWindow> {
    resolve_window(token).map(|w| w.with_shift(shift))
}

/// 工厂本地 "当前周" 的周标识（未选择周时的默认值）
pub fn current_week_token(now: DateTime<Utc>, offset: FixedOffset) -> String {
    let (year, week) = date_to_week(now.with_timezone(&offset).date_naive());
    week_token(year, week)
}
