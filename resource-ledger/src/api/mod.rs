//! REST APIハンドラー
//!
//! リソースCRUD、変更履歴、ユーザー管理、認証

pub mod auth;
pub mod error;
pub mod resources;
pub mod response;
pub mod users;

use crate::auth::middleware::jwt_auth_middleware;
use crate::AppState;
use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// APIルーターを作成
///
/// 変更系のリソース操作とユーザー更新/削除はJWT認証が必要。
pub fn create_app(state: AppState) -> Router {
    let public = Router::new()
        .route("/api", get(auth::hello))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/user",
            get(users::list_users).post(users::create_user),
        )
        .route("/api/user/:id", get(users::get_user))
        .route("/api/resource", get(resources::list_resources))
        .route("/api/resource/:id", get(resources::get_resource))
        .route(
            "/api/resource/:id/history",
            get(resources::resource_history),
        );

    let protected = Router::new()
        .route("/api/resource", post(resources::create_resource))
        .route(
            "/api/resource/:id",
            put(resources::update_resource).delete(resources::delete_resource),
        )
        .route(
            "/api/user/:id",
            patch(users::update_user).delete(users::delete_user),
        )
        .route_layer(from_fn_with_state(
            state.jwt_secret.clone(),
            jwt_auth_middleware,
        ));

    let cors = cors_layer(state.cors_origin.as_deref());

    public
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!("Invalid LEDGER_CORS_ORIGIN, allowing any origin: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
