// 認証ミドルウェア実装

use crate::api::error::AppError;
use crate::common::auth::ActingUser;
use crate::common::error::LedgerError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// JWT認証ミドルウェア
///
/// `Authorization: Bearer <token>` を検証し、検証済みの`Claims`と、
/// そこから変換した`ActingUser`をrequestの拡張データに格納する。
///
/// # Arguments
/// * `State(jwt_secret)` - JWT署名検証用のシークレットキー
/// * `request` - HTTPリクエスト
/// * `next` - 次のミドルウェア/ハンドラー
///
/// # Returns
/// * `Ok(Response)` - 認証成功、次の処理へ
/// * `Err(Response)` - 認証失敗、401 Unauthorized
pub async fn jwt_auth_middleware(
    State(jwt_secret): State<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            AppError(LedgerError::Authentication(
                "Missing Authorization header".to_string(),
            ))
            .into_response()
        })?
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError(LedgerError::Authentication(
                "Invalid Authorization header format".to_string(),
            ))
            .into_response()
        })?
        .trim()
        .to_string();

    let claims = crate::auth::jwt::verify_jwt(&token, &jwt_secret).map_err(|e| {
        tracing::warn!("JWT verification failed: {}", e);
        AppError(e).into_response()
    })?;

    let actor = ActingUser::try_from(&claims).map_err(|e| AppError(e).into_response())?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
