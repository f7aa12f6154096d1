//! ユーザー管理と認証

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::app::build_app;
use crate::support::http::{register_and_login, send_json};

#[tokio::test]
async fn test_login_by_email_and_failures_are_indistinguishable() {
    let (app, _) = build_app().await;
    register_and_login(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "identity": "alice@example.com", "password": "alice-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["expires_in"], 3600);
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, wrong_password) = send_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "identity": "alice", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = send_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "identity": "mallory", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn test_register_rejects_invalid_and_duplicate_users() {
    let (app, _) = build_app().await;
    register_and_login(&app, "alice").await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "bob", "email": "not-an-email", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "bob", "email": "bob@example.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/user",
        None,
        Some(json!({ "username": "alice", "email": "other@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_list_and_get_users() {
    let (app, _) = build_app().await;
    let (alice_id, _) = register_and_login(&app, "alice").await;
    register_and_login(&app, "bob").await;

    let (status, body) = send_json(&app, Method::GET, "/api/user", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send_json(&app, Method::GET, &format!("/api/user/{}", alice_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");

    let (status, _) = send_json(&app, Method::GET, "/api/user/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_only_self() {
    let (app, _) = build_app().await;
    let (alice_id, alice_token) = register_and_login(&app, "alice").await;
    let (bob_id, _) = register_and_login(&app, "bob").await;

    let (status, _) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/user/{}", bob_id),
        Some(&alice_token),
        Some(json!({ "names": "Not Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/user/{}", alice_id),
        Some(&alice_token),
        Some(json!({ "names": "Alice Liddell", "email": "alice@wonderland.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["names"], "Alice Liddell");
    assert_eq!(body["data"]["email"], "alice@wonderland.test");

    let (status, _) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/user/{}", alice_id),
        Some(&alice_token),
        Some(json!({ "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_user_requires_password() {
    let (app, _) = build_app().await;
    let (alice_id, alice_token) = register_and_login(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/user/{}", alice_id),
        Some(&alice_token),
        Some(json!({ "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "permission_error");

    let (status, _) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/user/{}", alice_id),
        Some(&alice_token),
        Some(json!({ "password": "alice-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, Method::GET, &format!("/api/user/{}", alice_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
