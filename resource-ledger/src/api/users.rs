//! ユーザー管理API
//!
//! 更新と削除は本人のみ（JWTのユーザーIDとパスのIDが一致する場合）

use super::error::AppError;
use super::resources::parse_id;
use super::response::ApiResponse;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::common::auth::{ActingUser, User};
use crate::common::error::LedgerError;
use crate::db::users::UserChanges;
use crate::types::user::{validate_email, validate_username};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// ユーザー名
    pub username: String,
    /// メールアドレス
    pub email: String,
    /// パスワード
    pub password: String,
    /// 氏名
    #[serde(default)]
    pub names: String,
}

/// ユーザー更新リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// ユーザー名（オプション）
    pub username: Option<String>,
    /// メールアドレス（オプション）
    pub email: Option<String>,
    /// 氏名（オプション）
    pub names: Option<String>,
    /// パスワード（オプション）
    pub password: Option<String>,
}

/// ユーザー削除リクエスト（パスワード再確認）
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    /// 現在のパスワード
    pub password: String,
}

/// ユーザーレスポンス（password_hash除外）
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// ユーザーID
    pub id: i64,
    /// ユーザー名
    pub username: String,
    /// メールアドレス
    pub email: String,
    /// 氏名
    pub names: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            names: user.names,
            created_at: user.created_at,
        }
    }
}

/// 入力を検証してユーザーを作成する（登録と管理APIで共通）
pub(crate) async fn create_user_from_request(
    app_state: &AppState,
    request: CreateUserRequest,
) -> Result<UserResponse, AppError> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let user = app_state
        .users
        .create_user(
            &request.username,
            &request.email,
            &password_hash,
            &request.names,
        )
        .await?;
    Ok(UserResponse::from(user))
}

fn require_self(actor: &ActingUser, id: i64) -> Result<(), AppError> {
    if actor.id.0 != id {
        return Err(AppError(LedgerError::Authentication(
            "Token does not belong to this user".to_string(),
        )));
    }
    Ok(())
}

/// GET /api/user - ユーザー一覧
pub async fn list_users(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = app_state.users.list_users().await?;
    Ok(Json(ApiResponse::with_data(
        "Users found",
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// GET /api/user/:id - ユーザー取得
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_id(&id)?;
    let user = app_state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {}", id)))?;
    Ok(Json(ApiResponse::with_data(
        "User found",
        UserResponse::from(user),
    )))
}

/// POST /api/user - ユーザー作成
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let Json(request) = payload?;
    let user = create_user_from_request(&app_state, request).await?;
    tracing::info!(user_id = user.id, "User created: {}", user.username);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("User created", user)),
    ))
}

/// PATCH /api/user/:id - ユーザー更新（本人のみ）
///
/// # Returns
/// * `200 OK` - 更新されたユーザー
/// * `401 Unauthorized` - 他人のID
/// * `409 Conflict` - ユーザー名またはメールアドレスが重複
pub async fn update_user(
    State(app_state): State<AppState>,
    Extension(actor): Extension<ActingUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_id(&id)?;
    require_self(&actor, id)?;
    let Json(request) = payload?;

    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    let password_hash = match &request.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = app_state
        .users
        .update_user(
            id,
            UserChanges {
                username: request.username.as_deref(),
                email: request.email.as_deref(),
                names: request.names.as_deref(),
                password_hash: password_hash.as_deref(),
            },
        )
        .await?;

    tracing::info!(user_id = user.id, "User updated: {}", user.username);
    Ok(Json(ApiResponse::with_data(
        "User updated",
        UserResponse::from(user),
    )))
}

/// DELETE /api/user/:id - ユーザー削除（本人のみ、パスワード再確認）
///
/// # Returns
/// * `200 OK` - 削除成功
/// * `401 Unauthorized` - 他人のID
/// * `403 Forbidden` - パスワード不一致
pub async fn delete_user(
    State(app_state): State<AppState>,
    Extension(actor): Extension<ActingUser>,
    Path(id): Path<String>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id)?;
    require_self(&actor, id)?;
    let Json(request) = payload?;

    let user = app_state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {}", id)))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError(LedgerError::Authorization(
            "Password confirmation failed".to_string(),
        )));
    }

    app_state.users.delete_user(id).await?;
    tracing::info!(user_id = id, "User deleted: {}", user.username);
    Ok(Json(ApiResponse::message("User deleted")))
}
