//! HTTP request handlers for the segment engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{export_lines, ledger_entries, process_run, worklog_entries};
use crate::models::RunResult;

use super::request::{ExportRequest, ProcessRequest};
use super::response::{
    ApiError, ApiErrorResponse, ExportResponse, HandoffResponse, ProcessResponse,
};
use super::state::AppState;

const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/process", post(process_handler))
        .route("/api/handoff", post(handoff_handler))
        .route("/api/export", post(export_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(json_response(StatusCode::BAD_REQUEST, error))
}

/// Handler for GET /api/health.
async fn health_handler() -> impl IntoResponse {
    json_response(
        StatusCode::OK,
        serde_json::json!({ "status": "ok", "engine_version": ENGINE_VERSION }),
    )
}

/// Handler for POST /api/process.
///
/// Runs the engine over the posted packets. The request's preference
/// mapping, when present, replaces the one loaded at startup for this run
/// only.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing run request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let config = state.config();
    let preferences = request
        .preferences
        .as_ref()
        .unwrap_or_else(|| config.preferences());

    let start_time = Instant::now();
    let result = process_run(
        &request.packets,
        config.engine(),
        preferences,
        request.work_date_override.as_deref(),
    );

    info!(
        correlation_id = %correlation_id,
        packets = request.packets.len(),
        detected = result.summary.detected,
        included = result.summary.included,
        excluded = result.summary.excluded,
        duration_us = start_time.elapsed().as_micros(),
        "Run completed"
    );

    json_response(
        StatusCode::OK,
        ProcessResponse {
            run_id: correlation_id,
            processed_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            result,
        },
    )
}

/// Handler for POST /api/handoff.
///
/// Projects a finished run into ledger and worklog entries.
async fn handoff_handler(payload: Result<Json<RunResult>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing hand-off request");

    let run = match parse_body(correlation_id, payload) {
        Ok(run) => run,
        Err(response) => return response,
    };

    let body = HandoffResponse {
        ledger: ledger_entries(&run),
        worklog: worklog_entries(&run, Utc::now()),
    };

    info!(
        correlation_id = %correlation_id,
        ledger = body.ledger.len(),
        worklog = body.worklog.len(),
        "Hand-off built"
    );

    json_response(StatusCode::OK, body)
}

/// Handler for POST /api/export.
///
/// Builds export lines for completed rows.
async fn export_handler(payload: Result<Json<ExportRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing export request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match export_lines(&request.rows) {
        Ok(lines) => {
            info!(
                correlation_id = %correlation_id,
                rows = request.rows.len(),
                lines = lines.len(),
                "Export built"
            );
            json_response(StatusCode::OK, ExportResponse { lines })
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Export failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}
