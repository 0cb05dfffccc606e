// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/api/calculations` | Multipart upload (`file` or `csv_file` part) |
//! | `GET` | `/api/calculations` | List every stored calculation |
//! | `GET` | `/api/calculations/{id}` | Fetch one calculation |
//! | `DELETE` | `/api/calculations/{id}` | Delete one calculation |
//!
//! The upload dialect comes from `?dialect=` or, when absent, from the file
//! extension (`.csv` generic, `.txt` time series).

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::application::calculation_service::{CalculationError, CalculationService};
use crate::domain::calculation::{Calculation, CalculationId, Metadata};
use crate::infrastructure::record_parser::Dialect;

const FILE_FIELDS: [&str; 2] = ["file", "csv_file"];

pub struct AppState {
    pub calculation_service: Arc<dyn CalculationService>,
}

pub fn app(service: Arc<dyn CalculationService>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState {
        calculation_service: service,
    });

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/calculations",
            get(list_calculations).post(upload_calculation),
        )
        .route(
            "/api/calculations/{id}",
            get(get_calculation).delete(delete_calculation),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub dialect: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    calculation_id: String,
    message: String,
}

#[derive(Serialize)]
struct CalculationResponse {
    success: bool,
    calculation: Calculation,
}

#[derive(Serialize)]
struct CalculationListResponse {
    calculations: Vec<Calculation>,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

fn not_found(id: &str) -> Response {
    failure(
        StatusCode::NOT_FOUND,
        format!("Calculation with ID {} not found", id),
    )
}

fn internal_error(err: CalculationError) -> Response {
    error!("Calculation service failure: {}", err);
    failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn upload_calculation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return failure(StatusCode::BAD_REQUEST, format!("Malformed upload: {}", e)),
        };

        let is_file_part = field
            .name()
            .is_some_and(|name| FILE_FIELDS.contains(&name));
        if !is_file_part {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(data) => {
                upload = Some((file_name, data));
                break;
            }
            Err(e) => {
                return failure(StatusCode::BAD_REQUEST, format!("Malformed upload: {}", e))
            }
        }
    }

    let Some((file_name, data)) = upload else {
        return failure(StatusCode::BAD_REQUEST, "No file part in the request");
    };
    if file_name.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "No file selected");
    }

    let dialect = match query.dialect.as_deref() {
        Some(requested) => match requested.parse::<Dialect>() {
            Ok(dialect) => dialect,
            Err(e) => return failure(StatusCode::BAD_REQUEST, e.to_string()),
        },
        None => match Dialect::from_file_name(&file_name) {
            Some(dialect) => dialect,
            None => {
                return failure(
                    StatusCode::BAD_REQUEST,
                    "Please upload a .csv or .txt file",
                )
            }
        },
    };

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let metadata = Metadata::from([
        ("filename".to_string(), json!(file_name)),
        ("user_agent".to_string(), json!(user_agent)),
    ]);

    match state
        .calculation_service
        .create_from_bytes(dialect, &data, metadata)
        .await
    {
        Ok(calculation) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                success: true,
                calculation_id: calculation.id().to_string(),
                message: format!("File {} processed successfully", file_name),
            }),
        )
            .into_response(),
        Err(e @ CalculationError::InvalidEncoding(_)) => {
            warn!(file_name = %file_name, "Rejected upload: {}", e);
            failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Error processing file: {}", e),
            )
        }
        Err(e) => internal_error(e),
    }
}

async fn list_calculations(State(state): State<Arc<AppState>>) -> Response {
    match state.calculation_service.list_calculations().await {
        Ok(calculations) => Json(CalculationListResponse { calculations }).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn get_calculation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    // Ids that are not UUIDs cannot name a stored calculation
    let Ok(calculation_id) = CalculationId::from_string(&id) else {
        return not_found(&id);
    };

    match state.calculation_service.get_calculation(calculation_id).await {
        Ok(Some(calculation)) => Json(CalculationResponse {
            success: true,
            calculation,
        })
        .into_response(),
        Ok(None) => not_found(&id),
        Err(e) => internal_error(e),
    }
}

async fn delete_calculation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(calculation_id) = CalculationId::from_string(&id) else {
        return not_found(&id);
    };

    match state.calculation_service.delete_calculation(calculation_id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: format!("Calculation with ID {} deleted successfully", id),
        })
        .into_response(),
        Ok(false) => not_found(&id),
        Err(e) => internal_error(e),
    }
}
