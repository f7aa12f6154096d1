//! サーバー初期化ロジック
//!
//! データベース接続、管理者作成、JWT秘密鍵の決定、サンプルデータ投入を行い
//! `AppState`を組み立てる。

use crate::auth::{bootstrap as admin, generate_random_token};
use crate::common::error::LedgerResult;
use crate::config::LedgerConfig;
use crate::{build_state, db, seed, AppState};
use tracing::{info, warn};

const GENERATED_JWT_SECRET_LENGTH: usize = 64;

/// 設定のJWT秘密鍵を使い、未設定なら生成する
///
/// 生成した鍵はプロセス内でのみ有効なので、再起動で既存トークンは無効になる。
pub fn resolve_jwt_secret(configured: Option<&str>) -> String {
    match configured {
        Some(secret) => secret.to_string(),
        None => {
            warn!(
                "LEDGER_JWT_SECRET not set, generated an ephemeral secret; tokens will not survive a restart"
            );
            generate_random_token(GENERATED_JWT_SECRET_LENGTH)
        }
    }
}

/// サーバー初期化を実行する
///
/// # Returns
/// * `Ok(AppState)` - 初期化済みのアプリケーション状態
/// * `Err(LedgerError)` - DB初期化、管理者作成、シード投入のいずれかが失敗
pub async fn initialize(config: &LedgerConfig) -> LedgerResult<AppState> {
    info!("Resource ledger v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::migrations::initialize_database(&config.database_url).await?;
    info!("Database initialized: {}", config.database_url);

    admin::ensure_admin_exists(&pool).await?;

    let jwt_secret = resolve_jwt_secret(config.jwt_secret.as_deref());
    info!("Authentication system initialized");

    let state = build_state(
        pool,
        jwt_secret,
        config.jwt_expiration_hours,
        config.cors_origin.clone(),
    );

    if config.seed_data {
        match admin::find_admin(&state.db_pool).await? {
            Some(user) => {
                seed::seed_if_empty(&state.resource_service, &user).await?;
            }
            None => warn!("No user available to attribute seed data, skipping"),
        }
    }

    Ok(state)
}
