use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// JSONリクエストを送り、ステータスとJSONボディを返す
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    send(app, builder.body(body).unwrap()).await
}

/// 任意のリクエストを送る
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// ユーザーを登録してログインし、(ユーザーID, トークン)を返す
pub async fn register_and_login(app: &Router, username: &str) -> (i64, String) {
    let password = format!("{}-password", username);
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "identity": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    (user_id, body["data"]["token"].as_str().unwrap().to_string())
}

/// リソースを作成してIDを返す
#[allow(dead_code)]
pub async fn create_resource(app: &Router, token: &str, name: &str, quantity: i64) -> i64 {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/resource",
        Some(token),
        Some(json!({ "name": name, "unit": "kg", "quantity": quantity })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"]["id"].as_i64().unwrap()
}
