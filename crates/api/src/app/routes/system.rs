use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::app::errors::{ApiError, ErrorKind};
use crate::app::services::AppServices;

/// Liveness. Never touches the store.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness: 204 while the store answers a ping, 503 otherwise.
pub async fn ready(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.health.ping().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!(error = %e, "readiness probe failed");
            let mut response = ApiError::new(ErrorKind::Internal, "not ready").into_response();
            *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
            response
        }
    }
}

/// Fallback for unmatched paths.
pub async fn not_found() -> ApiError {
    ApiError::not_found("recurso no encontrado")
}

/// Fallback for known paths requested with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
