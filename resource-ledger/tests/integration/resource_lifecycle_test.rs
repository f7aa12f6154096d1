//! リソースのCRUDと論理削除

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::app::build_app;
use crate::support::http::{create_resource, register_and_login, send_json};

#[tokio::test]
async fn test_create_get_update_delete() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        Some(&token),
        Some(json!({
            "name": "Steel",
            "description": "Structural steel",
            "unit": "kg",
            "quantity": 1000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "Steel");
    assert_eq!(body["data"]["quantity"], 1000);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(&app, Method::GET, &format!("/api/resource/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Structural steel");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/resource/{}", id),
        Some(&token),
        Some(json!({ "quantity": 750 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 750);
    assert_eq!(body["data"]["name"], "Steel");
    assert_eq!(body["data"]["unit"], "kg");

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/resource/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resource deleted");

    let (status, body) = send_json(&app, Method::GET, &format!("/api/resource/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "not_found");

    let (status, body) = send_json(&app, Method::GET, "/api/resource", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_mutations_require_token() {
    let (app, _) = build_app().await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        None,
        Some(json!({ "name": "Steel", "unit": "kg", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        Some("not-a-jwt"),
        Some(json!({ "name": "Steel", "unit": "kg", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, Method::GET, "/api/resource", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_name_is_conflict_and_name_reusable_after_delete() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Copper", 10).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        Some(&token),
        Some(json!({ "name": "Copper", "unit": "m", "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_name");

    let (status, _) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/resource/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reused = create_resource(&app, &token, "Copper", 5).await;
    assert_ne!(reused, id);
}

#[tokio::test]
async fn test_rename_onto_existing_name_is_conflict() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;
    create_resource(&app, &token, "Sand", 10).await;
    let gravel = create_resource(&app, &token, "Gravel", 10).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/resource/{}", gravel),
        Some(&token),
        Some(json!({ "name": "Sand" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_name");

    let (_, body) = send_json(&app, Method::GET, &format!("/api/resource/{}", gravel), None, None).await;
    assert_eq!(body["data"]["name"], "Gravel");
}

#[tokio::test]
async fn test_update_and_delete_missing_resource_is_not_found() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/api/resource/999",
        Some(&token),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::DELETE, "/api/resource/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
