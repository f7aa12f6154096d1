//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// ユーザー管理
pub mod users;

/// リソースストア
pub mod resources;

/// リソース変更履歴ストア（追記専用）
pub mod resource_history;

/// データベースマイグレーション
pub mod migrations;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

use crate::common::error::LedgerError;
use chrono::{DateTime, SecondsFormat, Utc};

/// タイムスタンプをDB保存用の文字列にする
///
/// 固定幅（マイクロ秒、`Z`）なので文字列比較で時系列順に並ぶ。
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// DB保存文字列からタイムスタンプを復元する
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LedgerError::StoreWrite(format!("Invalid timestamp '{}': {}", raw, e)))
}
