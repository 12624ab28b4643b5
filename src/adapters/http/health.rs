//! Liveness and readiness endpoints.
//!
//! - `GET /health` - JSON status including a store round-trip
//! - `GET|HEAD /ping` - plain `pong`

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::AppState;
use crate::domain::foundation::Timestamp;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// GET /health - 200 when the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let store_up = match state.conversations.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check: store unavailable: {}", e);
            false
        }
    };

    let (status, label) = if store_up {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: label,
        version: env!("CARGO_PKG_VERSION"),
        database: if store_up { "up" } else { "down" },
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
    };
    (status, Json(body))
}

/// GET /ping - axum answers HEAD on GET routes.
pub async fn ping() -> &'static str {
    "pong"
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ping", get(ping))
}
