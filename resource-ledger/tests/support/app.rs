use axum::Router;
use resource_ledger::{api::create_app, build_state, db, AppState};

/// テスト用のJWT秘密鍵
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// インメモリDBでアプリケーションを構築する
pub async fn build_app() -> (Router, AppState) {
    let pool = db::migrations::initialize_database("sqlite::memory:")
        .await
        .expect("failed to initialize in-memory database");
    let state = build_state(pool, TEST_JWT_SECRET.to_string(), 1, None);
    (create_app(state.clone()), state)
}
