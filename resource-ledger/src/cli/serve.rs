//! serve サブコマンド
//!
//! HTTPサーバーを起動します。

use crate::config::LedgerConfig;
use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port (overrides LEDGER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides LEDGER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// コマンドライン指定で設定を上書きする
    pub fn apply(&self, mut config: LedgerConfig) -> LedgerConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        config
    }
}

/// サーバーを初期化して起動する
pub async fn execute(args: &ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(LedgerConfig::from_env());
    let state = crate::bootstrap::initialize(&config).await?;
    crate::server::run(state, &config.bind_addr()).await?;
    Ok(())
}
