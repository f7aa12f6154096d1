//! リソースAPI
//!
//! 変更系ハンドラーはサービス呼び出しを`tokio::spawn`したタスクで実行する。
//! クライアントが切断してハンドラーのFutureが破棄されても、トランザクションは
//! 必ずコミットかロールバックで終わる。

use super::error::AppError;
use super::response::ApiResponse;
use crate::audit::types::{HistoryAction, ResourceHistoryEntry};
use crate::common::auth::ActingUser;
use crate::common::error::{LedgerError, LedgerResult};
use crate::types::resource::{NewResource, Resource, ResourceUpdate};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;

/// 履歴エントリのレスポンス（スナップショットはデコード済み）
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    /// エントリID
    pub id: i64,
    /// 対象リソースID
    pub resource_id: i64,
    /// 操作種別
    pub action: HistoryAction,
    /// 操作ユーザーID
    pub user_id: i64,
    /// 操作ユーザー名（ユーザーが削除済みならnull）
    pub username: Option<String>,
    /// 変更前の状態
    pub before: Option<Resource>,
    /// 変更後の状態
    pub after: Option<Resource>,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
    /// 説明
    pub description: String,
}

impl TryFrom<ResourceHistoryEntry> for HistoryEntryResponse {
    type Error = LedgerError;

    fn try_from(entry: ResourceHistoryEntry) -> Result<Self, Self::Error> {
        let before = entry.before()?;
        let after = entry.after()?;
        Ok(Self {
            id: entry.id,
            resource_id: entry.resource_id,
            action: entry.action,
            user_id: entry.user_id,
            username: entry.actor_username,
            before,
            after,
            timestamp: entry.timestamp,
            description: entry.description,
        })
    }
}

/// パスパラメータのIDを解釈する
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError(LedgerError::Validation(format!("Invalid id: {}", raw))))
}

/// 変更処理をハンドラーから切り離したタスクで実行する
async fn run_detached<T, F>(operation: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(operation)
        .await
        .map_err(|e| LedgerError::Internal(format!("Mutation task failed: {}", e)))?
}

/// GET /api/resource - リソース一覧
pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Resource>>>, AppError> {
    let resources = state.resource_service.list().await?;
    Ok(Json(ApiResponse::with_data("Resources found", resources)))
}

/// GET /api/resource/:id - リソース取得
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Resource>>, AppError> {
    let id = parse_id(&id)?;
    let resource = state.resource_service.get(id).await?;
    Ok(Json(ApiResponse::with_data("Resource found", resource)))
}

/// POST /api/resource - リソース作成
///
/// # Returns
/// * `201 Created` - 作成されたリソース
/// * `400 Bad Request` - 入力不正
/// * `409 Conflict` - 名前が重複
pub async fn create_resource(
    State(state): State<AppState>,
    Extension(actor): Extension<ActingUser>,
    payload: Result<Json<NewResource>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Resource>>), AppError> {
    let Json(candidate) = payload?;
    let service = state.resource_service.clone();
    let created = run_detached(async move { service.create(&actor, candidate).await }).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Resource created", created)),
    ))
}

/// PUT /api/resource/:id - リソース部分更新
///
/// リクエストに含まれるフィールドのみ更新する。
pub async fn update_resource(
    State(state): State<AppState>,
    Extension(actor): Extension<ActingUser>,
    Path(id): Path<String>,
    payload: Result<Json<ResourceUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Resource>>, AppError> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    let service = state.resource_service.clone();
    let updated = run_detached(async move { service.update(&actor, id, update).await }).await?;
    Ok(Json(ApiResponse::with_data("Resource updated", updated)))
}

/// DELETE /api/resource/:id - リソース削除
pub async fn delete_resource(
    State(state): State<AppState>,
    Extension(actor): Extension<ActingUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id)?;
    let service = state.resource_service.clone();
    run_detached(async move { service.delete(&actor, id).await }).await?;
    Ok(Json(ApiResponse::message("Resource deleted")))
}

/// GET /api/resource/:id/history - 変更履歴（新しい順）
pub async fn resource_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<HistoryEntryResponse>>>, AppError> {
    let id = parse_id(&id)?;
    let entries = state
        .resource_service
        .history(id)
        .await?
        .into_iter()
        .map(HistoryEntryResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ApiResponse::with_data("History found", entries)))
}
