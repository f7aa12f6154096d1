//! 入力検証とエラーエンベロープ

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use crate::support::app::build_app;
use crate::support::http::{register_and_login, send, send_json};

#[tokio::test]
async fn test_invalid_fields_are_rejected_with_details() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;

    for payload in [
        json!({ "name": "X", "unit": "kg", "quantity": 1 }),
        json!({ "name": "Steel", "unit": "", "quantity": 1 }),
        json!({ "name": "Steel", "unit": "kg", "quantity": -1 }),
    ] {
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/resource",
            Some(&token),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "validation_error");
        assert!(body["details"].is_string());
    }

    let (_, body) = send_json(&app, Method::GET, "/api/resource", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/resource")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Steel\", "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        Some(&token),
        Some(json!({ "name": "Steel", "unit": "kg", "quantity": "many" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_non_numeric_id_is_validation_error() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;

    let (status, body) = send_json(&app, Method::GET, "/api/resource/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send_json(&app, Method::GET, "/api/resource/abc/history", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/api/resource/abc",
        Some(&token),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hello_endpoint() {
    let (app, _) = build_app().await;
    let (status, body) = send_json(&app, Method::GET, "/api", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("data").is_none());
}
