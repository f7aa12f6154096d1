//! ファイルDBでの永続化

use axum::http::{Method, StatusCode};
use resource_ledger::{api::create_app, build_state, db};

use crate::support::app::TEST_JWT_SECRET;
use crate::support::http::{create_resource, register_and_login, send_json};

#[tokio::test]
async fn test_resources_and_history_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("ledger.db").display());

    let pool = db::migrations::initialize_database(&url).await.unwrap();
    let app = create_app(build_state(pool.clone(), TEST_JWT_SECRET.to_string(), 1, None));
    let (_, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Bricks", 5000).await;
    pool.close().await;

    let pool = db::migrations::initialize_database(&url).await.unwrap();
    let app = create_app(build_state(pool, TEST_JWT_SECRET.to_string(), 1, None));

    let (status, body) = send_json(&app, Method::GET, &format!("/api/resource/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 5000);

    let (_, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["username"], "alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_over_http_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("ledger.db").display());
    let pool = db::migrations::initialize_database(&url).await.unwrap();
    let app = create_app(build_state(pool, TEST_JWT_SECRET.to_string(), 1, None));
    let (_, token) = register_and_login(&app, "alice").await;
    let id = create_resource(&app, &token, "Steel", 1000).await;

    let tasks: Vec<_> = (1..=10)
        .map(|quantity| {
            let app = app.clone();
            let token = token.clone();
            tokio::spawn(async move {
                send_json(
                    &app,
                    Method::PUT,
                    &format!("/api/resource/{}", id),
                    Some(&token),
                    Some(serde_json::json!({ "quantity": quantity })),
                )
                .await
            })
        })
        .collect();
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "update failed: {}", body);
    }

    let (_, history) = send_json(
        &app,
        Method::GET,
        &format!("/api/resource/{}/history", id),
        None,
        None,
    )
    .await;
    let entries = history["data"].as_array().unwrap();
    assert_eq!(entries.len(), 11);

    let (_, current) = send_json(&app, Method::GET, &format!("/api/resource/{}", id), None, None).await;
    assert_eq!(current["data"]["quantity"], entries[0]["after"]["quantity"]);
}
