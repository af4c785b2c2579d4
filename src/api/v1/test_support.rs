//! Shared helpers for the handler tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, Settings, routes};
use crate::auth::{DEFAULT_SESSION_TTL, WorkFactor, hash_password_with_salt};
use crate::db::{Database, SqliteDatabase};

pub const TEST_PASSWORD: &str = "correct horse battery staple";
pub const TEST_VOICE_TOKEN: &str = "dg-test-token";

/// Settings with a cheap password hash so tests stay fast.
pub fn test_settings() -> Settings {
    Settings {
        admin_password_hash: Some(
            hash_password_with_salt(
                TEST_PASSWORD,
                b"test-salt",
                WorkFactor {
                    memory_kib: 8,
                    passes: 1,
                },
            )
            .unwrap(),
        ),
        voice_token: Some(TEST_VOICE_TOKEN.to_string()),
        cookie_secure: false,
        session_ttl: DEFAULT_SESSION_TTL,
    }
}

/// Create a test app with an in-memory database
pub async fn test_app() -> Router {
    test_app_with(test_settings()).await
}

pub async fn test_app_with(settings: Settings) -> Router {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    routes::create_router(AppState::new(db, settings), false, None)
}

/// Helper to parse JSON response body
pub async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Log in and return the `name=value` pair to send back as a Cookie header.
pub async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/admin/login",
            json!({"password": TEST_PASSWORD}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
