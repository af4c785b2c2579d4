//! Integration tests for school endpoints.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::test_support::{empty_request, json_body, json_request, login, test_app};

#[tokio::test(flavor = "multi_thread")]
async fn registered_school_is_active() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/schools",
            json!({
                "name": "Sunrise Public School",
                "email": "office@sunrise.example",
                "website": "https://sunrise.example"
            }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["status"], "active");
    assert_eq!(created["phone"], "");

    let cookie = login(&app).await;
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/schools", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], created["id"]);

    let uri = format!("/api/v1/schools/{}", created["id"].as_str().unwrap());
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            json!({"status": "inactive", "phone": "0755 123456"}),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["phone"], "0755 123456");
    assert_eq!(body["name"], "Sunrise Public School");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn school_requires_name_and_email() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/schools",
            json!({"phone": "123"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Missing required fields: name, email"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn school_list_requires_admin_session() {
    let app = test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/api/v1/schools", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
