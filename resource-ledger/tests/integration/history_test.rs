//! 変更履歴API

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::support::app::build_app;
use crate::support::http::{create_resource, register_and_login, send_json};

#[tokio::test]
async fn test_history_is_newest_first_with_snapshots() {
    let (app, _) = build_app().await;
    let (user_id, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Cement", 20).await;

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/resource/{}", id),
        Some(&token),
        Some(json!({ "quantity": 15, "description": "Portland cement" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/resource/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    let actions: Vec<_> = entries.iter().map(|e| e["action"].as_str().unwrap()).collect();
    assert_eq!(actions, ["DELETE", "UPDATE", "CREATE"]);

    for entry in entries {
        assert_eq!(entry["resource_id"], id);
        assert_eq!(entry["user_id"], user_id);
        assert_eq!(entry["username"], "alice");
    }

    let delete = &entries[0];
    assert!(delete["after"].is_null());
    assert_eq!(delete["before"]["quantity"], 15);

    let update = &entries[1];
    assert_eq!(update["before"]["quantity"], 20);
    assert_eq!(update["after"]["quantity"], 15);
    assert_eq!(update["after"]["description"], "Portland cement");
    assert!(update["description"].as_str().unwrap().contains("quantity"));

    let create = &entries[2];
    assert!(create["before"].is_null());
    assert_eq!(create["after"]["name"], "Cement");
    assert_eq!(create["description"], "Resource 'Cement' created");
}

#[tokio::test]
async fn test_history_survives_delete_and_unknown_id_is_not_found() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Coal", 50).await;
    send_json(
        &app,
        Method::DELETE,
        &format!("/api/resource/{}", id),
        Some(&token),
        None,
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send_json(&app, Method::GET, "/api/resource/4242/history", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_failed_mutations_leave_history_untouched() {
    let (app, _) = build_app().await;
    let (_, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Glass", 300).await;

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/resource/{}", id),
        Some(&token),
        Some(json!({ "quantity": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/resource",
        Some(&token),
        Some(json!({ "name": "Glass", "unit": "m2", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "CREATE");
}

#[tokio::test]
async fn test_history_keeps_actor_id_after_user_deleted() {
    let (app, _) = build_app().await;
    let (user_id, token) = register_and_login(&app, "bob").await;
    let id = create_resource(&app, &token, "Nuts", 1200).await;

    let (status, _) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/user/{}", user_id),
        Some(&token),
        Some(json!({ "password": "bob-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    let entry = &body["data"][0];
    assert_eq!(entry["user_id"], user_id);
    assert!(entry["username"].is_null());
}
