//! 認証API
//!
//! ユーザー登録とログイン（JWT発行）

use super::error::AppError;
use super::response::ApiResponse;
use super::users::{create_user_from_request, CreateUserRequest, UserResponse};
use crate::common::error::LedgerError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// メールアドレスまたはユーザー名
    pub identity: String,
    /// パスワード
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// JWTトークン
    pub token: String,
    /// 有効期限（秒）
    pub expires_in: i64,
    /// ユーザー情報
    pub user: UserResponse,
}

/// GET /api - 疎通確認
pub async fn hello() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Hello from resource-ledger"))
}

/// POST /api/auth/register - ユーザー登録
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let Json(request) = payload?;
    let user = create_user_from_request(&app_state, request).await?;
    tracing::info!(user_id = user.id, "User registered: {}", user.username);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("User created", user)),
    ))
}

/// POST /api/auth/login - ログイン
///
/// 識別子がメールアドレスとして解釈できればメールアドレスで、
/// それ以外はユーザー名でユーザーを検索する。
///
/// # Returns
/// * `200 OK` - JWTトークン
/// * `401 Unauthorized` - 識別子またはパスワードが不正（どちらかは明かさない）
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let Json(request) = payload?;

    let invalid = || {
        AppError(LedgerError::Authentication(
            "Invalid identity or password".to_string(),
        ))
    };

    let user = app_state
        .users
        .find_by_identity(&request.identity)
        .await?
        .ok_or_else(invalid)?;

    if !crate::auth::password::verify_password(&request.password, &user.password_hash)? {
        tracing::warn!("Login failed for user: {}", user.username);
        return Err(invalid());
    }

    let token = crate::auth::jwt::create_jwt(
        user.id,
        &user.username,
        &app_state.jwt_secret,
        app_state.jwt_expiration_hours,
    )?;

    tracing::info!(user_id = user.id, "User logged in: {}", user.username);

    Ok(Json(ApiResponse::with_data(
        "Login successful",
        LoginResponse {
            token,
            expires_in: app_state.jwt_expiration_hours * 3600,
            user: UserResponse::from(user),
        },
    )))
}
