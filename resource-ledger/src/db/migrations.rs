// データベース初期化とマイグレーション実行

use crate::common::error::{LedgerError, LedgerResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// 書き込みロック待ちの上限
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLiteデータベース接続プールを作成してマイグレーションを実行
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:data/ledger.db"）
///
/// # Returns
/// * `Ok(SqlitePool)` - 初期化済みデータベースプール
/// * `Err(LedgerError)` - 初期化失敗
pub async fn initialize_database(database_url: &str) -> LedgerResult<SqlitePool> {
    ensure_parent_dir(database_url)?;

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| LedgerError::store("Invalid database URL", e))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| LedgerError::store("Failed to connect to database", e))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// SQLiteファイルの親ディレクトリを作成する（`sqlite::memory:`等は対象外）
fn ensure_parent_dir(database_url: &str) -> LedgerResult<()> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    if path.starts_with(':') {
        return Ok(());
    }
    let normalized = path.trim_start_matches("//");
    let without_params = normalized.split('?').next().unwrap_or(normalized);
    if let Some(parent) = std::path::Path::new(without_params).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LedgerError::StoreWrite(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
pub async fn run_migrations(pool: &SqlitePool) -> LedgerResult<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| LedgerError::StoreWrite(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
