// ==========================================
// 集成测试环境
// ==========================================
// 职责: 临时数据库 + 完整组装的 AppState
// ==========================================

use line_audit::app::AppState;
use line_audit::domain::entity::Actor;
use tempfile::TempDir;

/// 测试环境（TempDir 需要保持存活）
pub struct TestEnv {
    pub _dir: TempDir,
    pub state: AppState,
}

/// 在临时目录中创建数据库并组装 AppState
pub async fn setup_test_env() -> TestEnv {
    line_audit::logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("line_audit.db").to_string_lossy().to_string();
    let state = AppState::new(db_path).await.unwrap();

    TestEnv { _dir: dir, state }
}

/// 写入默认目录：两条产线、一个工位、三名人员
pub fn seed_directory(state: &AppState) {
    state.store.add_line("LINE-01").unwrap();
    state.store.add_line("LINE-02").unwrap();
    state.store.add_station("FORNO").unwrap();

    state
        .store
        .upsert_user(&Actor::new("1001", "Ana Lima", "Líder de Produção").with_shift("1"))
        .unwrap();
    state
        .store
        .upsert_user(&Actor::new("1002", "Bruno Reis", "Supervisor de Linha").with_shift("2"))
        .unwrap();
    state
        .store
        .upsert_user(&Actor::new("1003", "Caio Nunes", "Operador").with_shift("1"))
        .unwrap();
}
