//! 統合テスト用ヘルパー

pub mod app;
pub mod http;
