//! Resource ledger server
//!
//! 在庫リソースのCRUDと、すべての変更をトランザクション内で記録する
//! 追記専用の変更履歴を提供する。

#![warn(missing_docs)]

/// 共通型定義（エラー、認証済みユーザー）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 変更履歴の記録（スナップショット、レコーダー）
pub mod audit;

/// 認証・認可機能
pub mod auth;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ロギング初期化ユーティリティ
pub mod logging;

/// サンプルデータ投入
pub mod seed;

/// axumサーバー
pub mod server;

/// リソース操作のオーケストレーション
pub mod service;

/// 型定義
pub mod types;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// JWT秘密鍵
    pub jwt_secret: String,
    /// JWT有効期限（時間）
    pub jwt_expiration_hours: i64,
    /// リソースサービス
    pub resource_service: Arc<service::ResourceService>,
    /// ユーザーリポジトリ
    pub users: Arc<dyn db::traits::UserRepository>,
    /// 許可するCORSオリジン（未設定なら全て許可）
    pub cors_origin: Option<String>,
}

/// SQLite実装で`AppState`を組み立てる
pub fn build_state(
    pool: sqlx::SqlitePool,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    cors_origin: Option<String>,
) -> AppState {
    AppState {
        resource_service: Arc::new(service::ResourceService::sqlite(pool.clone())),
        users: Arc::new(pool.clone()),
        db_pool: pool,
        jwt_secret,
        jwt_expiration_hours,
        cors_origin,
    }
}
