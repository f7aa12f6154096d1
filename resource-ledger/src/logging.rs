//! ロギング初期化
//!
//! 標準エラー出力へのfmtレイヤーと、`LEDGER_LOG_DIR`指定時の日次ローテーション
//! ファイルレイヤーを`EnvFilter`付きで登録する。

use crate::config::get_env_with_fallback;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// ログファイル名のプレフィックス
pub const LOG_FILE_PREFIX: &str = "resource-ledger.log";

/// ログ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// フィルタ式（`info`, `resource_ledger=debug,sqlx=warn` など）
    pub filter: String,
    /// ファイル出力先ディレクトリ
    pub directory: Option<std::path::PathBuf>,
}

impl LogSettings {
    /// 環境変数から読み込む
    ///
    /// `LEDGER_LOG_LEVEL`、次に`RUST_LOG`、どちらもなければ`info`。
    pub fn from_env() -> Self {
        let filter = get_env_with_fallback("LEDGER_LOG_LEVEL", "RUST_LOG")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let directory = std::env::var("LEDGER_LOG_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(std::path::PathBuf::from);
        Self { filter, directory }
    }

    /// フィルタを構築する（不正な式はデフォルトレベルに戻す）
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|e| {
            eprintln!(
                "Invalid log filter '{}' ({}), using '{}'",
                self.filter, e, DEFAULT_LOG_LEVEL
            );
            EnvFilter::new(DEFAULT_LOG_LEVEL)
        })
    }
}

/// ロギングを初期化する
///
/// # Returns
/// * `Ok(Some(WorkerGuard))` - ファイル出力あり。プロセス終了まで保持すること
/// * `Ok(None)` - 標準エラー出力のみ
/// * `Err` - ログディレクトリ作成またはサブスクライバー登録に失敗
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    init_with(&LogSettings::from_env())
}

/// 指定した設定でロギングを初期化する
pub fn init_with(settings: &LogSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(settings.env_filter());

    match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(settings.env_filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init()?;
            tracing::info!(directory = %dir.display(), "File logging enabled");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).try_init()?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in ["LEDGER_LOG_LEVEL", "RUST_LOG", "LEDGER_LOG_DIR"] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn settings_default_to_info_without_file() {
        clear_env();
        let settings = LogSettings::from_env();
        assert_eq!(settings.filter, "info");
        assert_eq!(settings.directory, None);
    }

    #[test]
    #[serial]
    fn settings_prefer_ledger_log_level_over_rust_log() {
        clear_env();
        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(LogSettings::from_env().filter, "warn");
        std::env::set_var("LEDGER_LOG_LEVEL", "debug");
        std::env::set_var("LEDGER_LOG_DIR", "/tmp/ledger-logs");
        let settings = LogSettings::from_env();
        assert_eq!(settings.filter, "debug");
        assert_eq!(
            settings.directory,
            Some(std::path::PathBuf::from("/tmp/ledger-logs"))
        );
        clear_env();
    }

    #[test]
    fn invalid_filter_falls_back() {
        let settings = LogSettings {
            filter: "resource_ledger=notalevel[".to_string(),
            directory: None,
        };
        assert_eq!(settings.env_filter().to_string(), DEFAULT_LOG_LEVEL);
    }
}
