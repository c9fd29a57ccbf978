use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use planboard::{
    routes::API_PREFIX,
    test_helpers::{test_router, test_state},
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn post_json(path: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(api_path(path))
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn post_json_auth(path: &str, payload: &serde_json::Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(api_path(path))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get_auth(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(api_path(path))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn register_payload(username: &str, email: &str) -> serde_json::Value {
    json!({ "username": username, "email": email, "password": "password123" })
}

#[tokio::test]
async fn health_route_works() {
    let state = test_state();

    let (status, body) = send(
        test_router(state),
        Request::builder()
            .uri(api_path("/public/health"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ok"], true);
}

#[tokio::test]
async fn register_returns_tokens_without_leaking_the_hash() {
    let state = test_state();

    let (status, body) = send(
        test_router(state),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert!(data["access_token"].as_str().is_some());
    assert!(data["refresh_token"].as_str().is_some());
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["user"]["username"], "alice");
    assert!(data["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_conflicts_report_username_before_email() {
    let state = test_state();
    let (status, _) = send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    let (status, body) = send(
        test_router(state),
        post_json("/auth/register", &register_payload("bob", "Alice@Example.COM")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let state = test_state();
    send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;

    let (status, body) = send(
        test_router(state),
        post_json("/auth/login", &json!({ "username": "alice", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn me_without_token_is_rejected() {
    let state = test_state();

    let (status, _) = send(
        test_router(state),
        Request::builder()
            .uri(api_path("/me"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_session_lifecycle() {
    let state = test_state();
    send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;

    let (status, body) = send(
        test_router(state.clone()),
        post_json(
            "/auth/login",
            &json!({ "username": "alice", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send(test_router(state.clone()), get_auth("/me", &access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");

    // Rotation: the new refresh token replaces the old one.
    let (status, body) = send(
        test_router(state.clone()),
        post_json("/auth/refresh", &json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    let (status, body) = send(
        test_router(state.clone()),
        post_json("/auth/refresh", &json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid refresh token");

    let (status, _) = send(
        test_router(state.clone()),
        post_json_auth("/auth/logout", &json!({}), &access),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Access tokens are stateless; logout only kills the refresh side.
    let (status, _) = send(test_router(state.clone()), get_auth("/me", &access)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        test_router(state),
        post_json("/auth/refresh", &json!({ "refresh_token": rotated })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_the_admin_role() {
    let state = test_state();

    let (_, body) = send(
        test_router(state.clone()),
        post_json(
            "/auth/register",
            &json!({
                "username": "root",
                "email": "root@example.com",
                "password": "password123",
                "role": "admin"
            }),
        ),
    )
    .await;
    let admin_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (_, body) = send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;
    let user_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        test_router(state.clone()),
        get_auth("/admin/stats", &admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admin"], "root");

    let (status, _) = send(
        test_router(state.clone()),
        get_auth("/admin/stats", &user_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        test_router(state),
        Request::builder()
            .uri(api_path("/admin/stats"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivation_revokes_access_immediately() {
    let state = test_state();

    let (_, body) = send(
        test_router(state.clone()),
        post_json(
            "/auth/register",
            &json!({
                "username": "root",
                "email": "root@example.com",
                "password": "password123",
                "role": "admin"
            }),
        ),
    )
    .await;
    let admin_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (_, body) = send(
        test_router(state.clone()),
        post_json("/auth/register", &register_payload("alice", "alice@example.com")),
    )
    .await;
    let user_token = body["data"]["access_token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(test_router(state.clone()), get_auth("/me", &user_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        test_router(state.clone()),
        post_json_auth(
            &format!("/admin/users/{user_id}/active"),
            &json!({ "active": false }),
            &admin_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The still-unexpired access token no longer resolves to a principal.
    let (status, body) = send(test_router(state), get_auth("/me", &user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}
