//! Integration tests for lead endpoints.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::test_support::{empty_request, json_body, json_request, login, test_app};

#[tokio::test(flavor = "multi_thread")]
async fn submitted_lead_appears_in_admin_list() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/leads",
            json!({"name": "A", "email": "a@x.com", "phone": "123"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["status"], "new");

    let cookie = login(&app).await;
    let response = app
        .oneshot(empty_request("GET", "/api/v1/leads", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let leads = body.as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["id"], id.as_str());
    assert_eq!(leads[0]["name"], "A");
    assert_eq!(leads[0]["email"], "a@x.com");
    assert_eq!(leads[0]["phone"], "123");
    assert_eq!(leads[0]["status"], "new");
}

#[tokio::test(flavor = "multi_thread")]
async fn lead_requires_name_email_and_phone() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/leads",
            json!({"name": "A", "email": "a@x.com"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Missing required fields: phone"
    );

    let cookie = login(&app).await;
    let response = app
        .oneshot(empty_request("GET", "/api/v1/leads", Some(&cookie)))
        .await
        .unwrap();
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn client_cannot_choose_initial_status() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/leads",
            json!({
                "name": "A",
                "email": "a@x.com",
                "phone": "123",
                "schoolName": "Sunrise",
                "status": "converted"
            }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "new");
    assert_eq!(body["school_name"], "Sunrise");
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_updates_status_and_filters() {
    let app = test_app().await;
    let cookie = login(&app).await;

    let mut ids = Vec::new();
    for name in ["A", "B"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/leads",
                json!({"name": name, "email": "x@x.com", "phone": "1"}),
                None,
            ))
            .await
            .unwrap();
        ids.push(json_body(response).await["id"].as_str().unwrap().to_string());
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/leads/{}", ids[0]),
            json!({"status": "contacted"}),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "contacted");

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/leads?status=contacted",
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "A");

    // Newest first
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/leads", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], "B");
    assert_eq!(body[1]["name"], "A");

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/v1/leads/{}", ids[1]),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/leads/{}", ids[1]),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Lead not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn lead_list_requires_admin_session() {
    let app = test_app().await;

    let response = app
        .oneshot(empty_request("GET", "/api/v1/leads", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
