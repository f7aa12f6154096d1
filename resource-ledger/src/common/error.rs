//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `LedgerError`は`error_type()`と`status_code()`メソッドを提供し、
//! 安定した分類コード付きのエラーレスポンスを生成できます。

use axum::http::StatusCode;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// resource ledger error type
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// 入力値が不正（ストレージに触れる前に拒否）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 参照先が存在しない
    #[error("Not found: {0}")]
    NotFound(String),

    /// リソース名の一意制約違反
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// トランザクション内の書き込み失敗（全体がロールバックされる）
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// スナップショットのエンコード/デコード失敗
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization error
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Conflict error (e.g., duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns a safe error message for external clients.
    ///
    /// Full error details (SQL messages, file paths) are only written to the
    /// server logs via the `Display` implementation.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(CommonError::Validation(_)) => "Validation failed",
            Self::Common(_) => "Request error",
            Self::Validation(_) => "Validation failed",
            Self::NotFound(_) => "Not found",
            Self::DuplicateName(_) => "Resource name already exists",
            Self::StoreWrite(_) => "Database error",
            Self::Serialization(_) => "Snapshot serialization error",
            Self::PasswordHash(_) => "Authentication error",
            Self::Jwt(_) => "Authentication error",
            Self::Authentication(_) => "Authentication failed",
            Self::Authorization(_) => "Access denied",
            Self::Conflict(_) => "Resource conflict",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the stable reason classification.
    ///
    /// # Error Types
    ///
    /// - `validation_error`: malformed or out-of-range input
    /// - `not_found`: referenced record does not exist
    /// - `duplicate_name`: resource name uniqueness violation
    /// - `store_write_error`: transactional failure, fully rolled back
    /// - `serialization_error`: snapshot encode/decode failure
    /// - `authentication_error` / `permission_error` / `conflict` / `server_error`
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Common(CommonError::Validation(_)) => "validation_error",
            Self::Common(CommonError::Serialization(_)) => "serialization_error",
            Self::Common(CommonError::Config(_)) => "server_error",
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::DuplicateName(_) => "duplicate_name",
            Self::StoreWrite(_) => "store_write_error",
            Self::Serialization(_) => "serialization_error",
            Self::PasswordHash(_) => "server_error",
            Self::Jwt(_) => "authentication_error",
            Self::Authentication(_) => "authentication_error",
            Self::Authorization(_) => "permission_error",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(CommonError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateName(_) => StatusCode::CONFLICT,
            Self::StoreWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Jwt(_) => StatusCode::UNAUTHORIZED,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// sqlxエラーをストア書き込みエラーへ変換する
    pub fn store(context: &str, err: sqlx::Error) -> Self {
        Self::StoreWrite(format!("{}: {}", context, err))
    }
}

/// sqlxエラーが一意制約違反かどうか
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (resource ledger)
pub type LedgerResult<T> = Result<T, LedgerError>;
