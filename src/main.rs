// ==========================================
// 产线点检系统 - 命令行入口
// ==========================================
// 启动后输出当前周的合规概况与待办提醒
// ==========================================

use chrono::Utc;
use line_audit::app::{get_default_db_path, AppState};
use line_audit::domain::compliance::MatrixKind;
use line_audit::domain::entity::Actor;
use line_audit::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", line_audit::APP_NAME);
    tracing::info!("系统版本: {}", line_audit::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await?;
    let now = Utc::now();

    // 可选参数: 周标识，默认当前周
    let week_token = match std::env::args().nth(1) {
        Some(token) => token,
        None => state.audit_api.current_week_token(now).await?,
    };

    for kind in [MatrixKind::Lines, MatrixKind::Maintenance, MatrixKind::Leaders] {
        let matrix = state
            .audit_api
            .matrix_for_week(kind, &week_token, "ALL", now)
            .await?;

        if matrix.window.is_none() {
            tracing::warn!(week = %week_token, "周标识无效");
            break;
        }

        for row in &matrix.rows {
            let summary = row.summary();
            tracing::info!(
                kind = %kind,
                week = %week_token,
                entity = %row.entity_name,
                ok = summary.ok,
                ng = summary.ng,
                pending = summary.pending,
                "合规概况"
            );
        }
    }

    // 以管理员视角统计待说明停线单
    let admin = Actor::new("system", "system", "ADMIN").as_admin();
    let pending = state.dashboard_api.pending_count_for(&admin).await?;
    tracing::info!(pending, "待说明停线单");

    let missing = state.dashboard_api.missing_leaders_today(now).await?;
    if !missing.is_empty() {
        tracing::warn!(count = missing.len(), leaders = ?missing, "今日尚未点检的班组长");
    }

    Ok(())
}
