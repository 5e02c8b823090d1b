//! Liveness and readiness probes.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// `GET /health`
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// `GET /ready`
pub async fn readiness_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
        })),
    )
}
