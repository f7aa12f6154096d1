//! migrate サブコマンド
//!
//! データベースを作成してマイグレーションを適用します。

use crate::config::LedgerConfig;
use clap::Args;

/// migrate サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Database URL (overrides LEDGER_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// マイグレーションを適用する
pub async fn execute(args: &MigrateArgs) -> anyhow::Result<()> {
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(|| LedgerConfig::from_env().database_url);
    let pool = crate::db::migrations::initialize_database(&database_url).await?;
    pool.close().await;
    tracing::info!("Database is up to date: {}", database_url);
    Ok(())
}
