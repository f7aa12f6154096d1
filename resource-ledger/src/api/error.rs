//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::{CommonError, LedgerError};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub LedgerError);

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(LedgerError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(LedgerError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error_type = self.0.error_type(), "Request failed: {}", self.0);
        } else {
            tracing::debug!(error_type = self.0.error_type(), "Request rejected: {}", self.0);
        }

        // SQLエラーやファイルパスはログにのみ出力する
        let mut payload = json!({
            "status": "error",
            "message": self.0.external_message(),
            "error": self.0.error_type(),
        });

        // 入力検証エラーは詳細を返す
        if let LedgerError::Validation(detail) | LedgerError::Common(CommonError::Validation(detail)) =
            &self.0
        {
            payload["details"] = json!(detail);
        }

        (status, Json(payload)).into_response()
    }
}
