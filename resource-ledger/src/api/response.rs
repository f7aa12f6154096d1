//! 成功レスポンスのエンベロープ

use serde::Serialize;

/// `{"status":"success","message":...,"data":...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// 常に"success"
    pub status: &'static str,
    /// メッセージ
    pub message: String,
    /// データ（ない場合は省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// データ付きの成功レスポンス
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// メッセージのみの成功レスポンス
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}
