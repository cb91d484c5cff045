//! HTTP routes for the transform API.
//!
//! Bodies are taken as raw bytes and parsed here, so a malformed body
//! answers 400 with the same `{ error, kind }` payload as any other failure.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use hexakin_core::transform::{
    ErrorResponse, FailureKind, TransformFailure, TransformMode, TransformRequest,
};
use hexakin_interaction::TransformService;
use serde_json::Value;

pub fn router(service: Arc<TransformService>) -> Router {
    Router::new()
        .route("/api/transform", post(transform))
        .route("/api/:mode", post(transform_mode))
        .with_state(service)
}

async fn transform(State(service): State<Arc<TransformService>>, body: Bytes) -> Response {
    match parse_request(&body, None) {
        Ok(request) => run(&service, request).await,
        Err(failure) => failure_response(&failure),
    }
}

async fn transform_mode(
    State(service): State<Arc<TransformService>>,
    Path(mode): Path<String>,
    body: Bytes,
) -> Response {
    let Ok(mode) = TransformMode::from_str(&mode) else {
        tracing::info!("[Server] Unknown mode: {}", mode);
        let body = ErrorResponse {
            error: format!("Unknown mode: {mode}"),
            kind: None,
        };
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };

    match parse_request(&body, Some(mode)) {
        Ok(request) => run(&service, request).await,
        Err(failure) => failure_response(&failure),
    }
}

/// Parses the body, letting `mode` from the path override the body's.
fn parse_request(
    body: &[u8],
    mode: Option<TransformMode>,
) -> Result<TransformRequest, TransformFailure> {
    let mut value: Value = serde_json::from_slice(body)
        .map_err(|err| TransformFailure::Validation(format!("Invalid JSON body: {err}")))?;

    if let Some(mode) = mode {
        let Value::Object(fields) = &mut value else {
            return Err(TransformFailure::Validation(
                "Request body must be a JSON object.".into(),
            ));
        };
        fields.insert("mode".into(), Value::String(mode.to_string()));
    }

    serde_json::from_value(value)
        .map_err(|err| TransformFailure::Validation(format!("Invalid request: {err}")))
}

async fn run(service: &TransformService, request: TransformRequest) -> Response {
    let mode = request.mode;
    tracing::info!(
        "[Server] {} request, input length {}",
        mode,
        request.input_text.chars().count()
    );

    match service.handle(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(failure) => {
            match failure.kind() {
                FailureKind::Validation => {
                    tracing::info!("[Server] {} rejected: {}", mode, failure.detail())
                }
                kind => tracing::error!("[Server] {} failed ({:?}): {}", mode, kind, failure.detail()),
            }
            failure_response(&failure)
        }
    }
}

fn failure_response(failure: &TransformFailure) -> Response {
    let status =
        StatusCode::from_u16(failure.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(failure))).into_response()
}
