//! リソース変更履歴（監査ログ）
//!
//! リソースへのすべての変更を、変更前後の完全なスナップショットと操作ユーザー付きで
//! 追記専用の履歴として記録する

/// 履歴の型定義
pub mod types;

/// スナップショットのエンコード/デコード
pub mod snapshot;

/// トランザクション内で履歴を追記するレコーダー
pub mod recorder;
