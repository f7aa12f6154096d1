//! 初回起動時の管理者アカウント作成
//!
//! 環境変数から管理者を作成する。パスワードが未設定の場合は
//! ランダムなパスワードを生成してログに出力する。

use crate::auth::generate_random_token;
use crate::auth::password::hash_password;
use crate::common::auth::User;
use crate::common::error::LedgerError;
use crate::config::{get_env_with_fallback, get_env_with_fallback_or};
use crate::db;
use crate::db::traits::UserRepository;

/// 管理者ユーザー名のデフォルト
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// 管理者メールアドレスのデフォルト
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

const GENERATED_PASSWORD_LENGTH: usize = 20;

fn admin_username() -> String {
    get_env_with_fallback_or(
        "LEDGER_ADMIN_USERNAME",
        "ADMIN_USERNAME",
        DEFAULT_ADMIN_USERNAME,
    )
}

/// 環境変数から管理者を作成
///
/// # Environment Variables
/// * `LEDGER_ADMIN_USERNAME` - 管理者ユーザー名（省略時: "admin"）
/// * `LEDGER_ADMIN_PASSWORD` - 管理者パスワード（省略時: ランダム生成）
/// * `LEDGER_ADMIN_EMAIL` - 管理者メールアドレス（省略時: "admin@localhost"）
///
/// # Returns
/// * `Ok(User)` - 作成された（または既存の）管理者
/// * `Err(LedgerError)` - 作成失敗
pub async fn create_admin_from_env(pool: &sqlx::SqlitePool) -> Result<User, LedgerError> {
    let username = admin_username();
    let email = get_env_with_fallback_or("LEDGER_ADMIN_EMAIL", "ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);

    let password = match get_env_with_fallback("LEDGER_ADMIN_PASSWORD", "ADMIN_PASSWORD") {
        Some(p) if !p.is_empty() => p,
        _ => {
            let generated = generate_random_token(GENERATED_PASSWORD_LENGTH);
            tracing::warn!(
                "LEDGER_ADMIN_PASSWORD not set, generated admin password for '{}': {}",
                username,
                generated
            );
            generated
        }
    };

    let password_hash = hash_password(&password)?;

    match db::users::create(pool, &username, &email, &password_hash, "Administrator").await {
        Ok(user) => {
            tracing::info!("Created admin user from env: username={}", user.username);
            Ok(user)
        }
        Err(LedgerError::Conflict(_)) => {
            tracing::warn!("Admin user {} already exists, skipping creation", username);
            db::users::find_by_username(pool, &username)
                .await?
                .ok_or_else(|| {
                    LedgerError::Conflict(format!("Admin email '{}' is already taken", email))
                })
        }
        Err(e) => {
            tracing::error!("Failed to create admin user from env: {}", e);
            Err(e)
        }
    }
}

/// 初回起動時の管理者作成処理
///
/// ユーザーが1人も存在しない場合のみ環境変数から管理者を作成する。
///
/// # Returns
/// * `Ok(Some(User))` - 管理者を作成した
/// * `Ok(None)` - ユーザーが既に存在するためスキップ
pub async fn ensure_admin_exists(pool: &sqlx::SqlitePool) -> Result<Option<User>, LedgerError> {
    if !pool.is_first_boot().await? {
        tracing::debug!("Users already exist, skipping admin creation");
        return Ok(None);
    }

    tracing::info!("First boot detected, creating admin user");
    create_admin_from_env(pool).await.map(Some)
}

/// シードデータの帰属先となる管理者を取得
///
/// 設定上の管理者ユーザー名を優先し、見つからなければ最初に作成されたユーザーを返す。
pub async fn find_admin(pool: &sqlx::SqlitePool) -> Result<Option<User>, LedgerError> {
    if let Some(user) = db::users::find_by_username(pool, &admin_username()).await? {
        return Ok(Some(user));
    }
    Ok(db::users::list(pool).await?.into_iter().next())
}
