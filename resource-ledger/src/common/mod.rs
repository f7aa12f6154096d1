//! 共通型定義

/// 認証モデル（ユーザー、JWTクレーム、操作ユーザー）
pub mod auth;

/// エラー型
pub mod error;
