// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the HTTP adapter

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use async_trait::async_trait;
use emergy_core::application::calculation_service::StandardCalculationService;
use emergy_core::domain::repository::{CalculationRepository, RepositoryError};
use emergy_core::domain::{Calculation, CalculationId};
use emergy_core::infrastructure::repositories::InMemoryCalculationRepository;
use emergy_core::presentation::api;

const BOUNDARY: &str = "emergy-test-boundary";
const READINGS: &str = "Date;Time;Global_active_power;Global_reactive_power;Voltage;Global_intensity;Sub_metering_1;Sub_metering_2;Sub_metering_3\n16/12/2006;17:24:00;4.216;0.418;234.84;18.4;0.0;1.0;17.0\n";

fn setup_app() -> Router {
    let repository = Arc::new(InMemoryCalculationRepository::new());
    let service = Arc::new(StandardCalculationService::new(repository));
    api::app(service, 1024 * 1024)
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::USER_AGENT, "api-tests/1.0")
        .body(Body::from(multipart_body(field, file_name, content)))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn upload(app: &Router, file_name: &str, content: &[u8]) -> String {
    let response = app
        .clone()
        .oneshot(upload_request("/api/calculations", "file", file_name, content))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    body["calculation_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = setup_app();

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_upload_time_series_then_fetch() {
    let app = setup_app();
    let id = upload(&app, "household.txt", READINGS.as_bytes()).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/calculations/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let calculation = &body["calculation"];
    assert_eq!(body["success"], true);
    assert_eq!(calculation["id"], id.as_str());
    assert_eq!(calculation["inputs"].as_array().unwrap().len(), 7);
    assert_eq!(calculation["inputs"][0]["unit"], "kW");
    assert_eq!(calculation["inputs"][0]["value"], 4.216);
    assert_eq!(calculation["metadata"]["filename"], "household.txt");
    assert_eq!(calculation["metadata"]["user_agent"], "api-tests/1.0");
    assert!(calculation["created_at"].is_string());
    assert!(calculation["total_emergy"].is_number());
}

#[tokio::test]
async fn test_csv_upload_uses_stub_inputs() {
    let app = setup_app();
    let id = upload(&app, "inputs.csv", b"name,value\nwater,3.5\n").await;

    let response = app
        .oneshot(empty_request("GET", &format!("/api/calculations/{}", id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["calculation"]["inputs"].as_array().unwrap().len(), 2);
    assert_eq!(body["calculation"]["total_emergy"], 30.0);
}

#[tokio::test]
async fn test_dialect_query_overrides_extension() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(upload_request(
            "/api/calculations?dialect=time_series",
            "csv_file",
            "readings.csv",
            READINGS.as_bytes(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = extract_json(response.into_body()).await["calculation_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(empty_request("GET", &format!("/api/calculations/{}", id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["calculation"]["inputs"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = setup_app();

    let unsupported = app
        .clone()
        .oneshot(upload_request("/api/calculations", "file", "report.pdf", b"%PDF"))
        .await
        .unwrap();
    assert_eq!(unsupported.status(), StatusCode::BAD_REQUEST);
    assert_eq!(extract_json(unsupported.into_body()).await["success"], false);

    let no_name = app
        .clone()
        .oneshot(upload_request("/api/calculations", "file", "", READINGS.as_bytes()))
        .await
        .unwrap();
    assert_eq!(no_name.status(), StatusCode::BAD_REQUEST);

    let wrong_field = app
        .clone()
        .oneshot(upload_request("/api/calculations", "attachment", "data.txt", READINGS.as_bytes()))
        .await
        .unwrap();
    assert_eq!(wrong_field.status(), StatusCode::BAD_REQUEST);

    let bad_dialect = app
        .clone()
        .oneshot(upload_request(
            "/api/calculations?dialect=xlsx",
            "file",
            "data.txt",
            READINGS.as_bytes(),
        ))
        .await
        .unwrap();
    assert_eq!(bad_dialect.status(), StatusCode::BAD_REQUEST);

    let not_utf8 = app
        .clone()
        .oneshot(upload_request("/api/calculations", "file", "data.txt", &[0x44, 0xff, 0xfe, 0x3b]))
        .await
        .unwrap();
    assert_eq!(not_utf8.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let listed = app.oneshot(empty_request("GET", "/api/calculations")).await.unwrap();
    let body = extract_json(listed.into_body()).await;
    assert!(body["calculations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = setup_app();
    let first = upload(&app, "a.txt", READINGS.as_bytes()).await;
    let second = upload(&app, "b.txt", READINGS.as_bytes()).await;
    assert_ne!(first, second);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/calculations"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let ids: Vec<&str> = body["calculations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));

    let uri = format!("/api/calculations/{}", first);
    let deleted = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(extract_json(deleted.into_body()).await["success"], true);

    let again = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let gone = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let app = setup_app();

    let unknown = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/calculations/550e8400-e29b-41d4-a716-446655440000",
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body = extract_json(unknown.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("not found"));

    let malformed = app
        .oneshot(empty_request("DELETE", "/api/calculations/not-an-id"))
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

struct OfflineRepository;

#[async_trait]
impl CalculationRepository for OfflineRepository {
    async fn save(&self, _calculation: &Calculation) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage("store offline".to_string()))
    }

    async fn find_by_id(&self, _id: CalculationId) -> Result<Option<Calculation>, RepositoryError> {
        Err(RepositoryError::Storage("store offline".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Calculation>, RepositoryError> {
        Err(RepositoryError::Storage("store offline".to_string()))
    }

    async fn delete(&self, _id: CalculationId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Storage("store offline".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let service = Arc::new(StandardCalculationService::new(Arc::new(OfflineRepository)));
    let app = api::app(service, 1024 * 1024);

    let upload = app
        .clone()
        .oneshot(upload_request("/api/calculations", "file", "a.txt", READINGS.as_bytes()))
        .await
        .unwrap();
    assert_eq!(upload.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(upload.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("store offline"));

    let listed = app.oneshot(empty_request("GET", "/api/calculations")).await.unwrap();
    assert_eq!(listed.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
