//! ドメイン型定義

/// 在庫リソース
pub mod resource;

/// ユーザー入力の検証
pub mod user;
