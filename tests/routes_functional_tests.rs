//! Functional tests for the HTTP API.
//!
//! These drive the full axum router against the local repository, checking
//! JSON round-trips and error status mapping.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use qval_rust::db::repositories::LocalRepository;
use qval_rust::db::repository::FullRepository;
use qval_rust::http::{create_router, AppState};

fn test_app() -> (axum::Router, Arc<LocalRepository>) {
    let repo = Arc::new(LocalRepository::new());
    let state = AppState::new(repo.clone() as Arc<dyn FullRepository>);
    (create_router(state), repo)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _repo) = test_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_create_precondition_returns_assigned_id() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/feature-preconditions",
            json!({"answer": "yes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["answer"], "yes");
}

#[tokio::test]
async fn test_update_precondition_replaces_answer() {
    let (app, _repo) = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/feature-preconditions",
            json!({"answer": "yes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/feature-preconditions/1",
            json!({"answer": "no"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["answer"], "no");
}

#[tokio::test]
async fn test_update_missing_precondition_is_404() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/feature-preconditions/2",
            json!({"answer": "no"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_questionnaire_round_trip() {
    let (app, _repo) = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/questionnaires",
            json!({"name": "Sprint review"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Sprint review");

    let response = app
        .clone()
        .oneshot(get_request("/api/questionnaires"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/questionnaires/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["deleted"], 1);
}

#[tokio::test]
async fn test_blank_questionnaire_name_is_400() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(json_request("POST", "/api/questionnaires", json!({"name": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_validation_answer_round_trip() {
    let (app, _repo) = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/validation-answers",
            json!({
                "row_id": 1,
                "answer": "yes",
                "type": "TEXT",
                "questionnaire_id": 1,
                "validation_id": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["id"], 1);
    assert_eq!(saved["type"], "TEXT");

    let response = app
        .clone()
        .oneshot(get_request("/api/validation-answers?questionnaire_id=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/validation-answers?questionnaire_id=1&row_id=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["deleted"], 1);
}

#[tokio::test]
async fn test_invalid_validation_answer_is_400() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/validation-answers",
            json!({
                "row_id": 0,
                "answer": "yes",
                "type": "TEXT",
                "questionnaire_id": 1,
                "validation_id": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reference_endpoints_return_seeded_rows() {
    let (app, repo) = test_app();

    repo.insert_validation_impl(qval_rust::api::Validation {
        id: qval_rust::api::ValidationId::new(1),
        name: "Frequency".to_string(),
        validation_type: "SELECT".to_string(),
        weight: 5,
    });
    repo.insert_validation_value_impl(qval_rust::api::ValidationValue {
        id: 1,
        value: "ALWAYS".to_string(),
        label: "Always".to_string(),
    });

    let response = app
        .clone()
        .oneshot(get_request("/api/validations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let validations = body_json(response).await;
    assert_eq!(validations[0]["type"], "SELECT");

    let response = app
        .clone()
        .oneshot(get_request("/api/validation-values"))
        .await
        .unwrap();
    let values = body_json(response).await;
    assert_eq!(values[0]["label"], "Always");

    let response = app
        .oneshot(get_request("/api/validation-summaries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summaries = body_json(response).await;
    assert_eq!(summaries.as_array().unwrap().len(), 0);
}
