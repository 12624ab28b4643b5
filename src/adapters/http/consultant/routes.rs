use axum::routing::{get, post};
use axum::Router;

use super::handlers::{assign_consultant, close_conversation, get_transcript};
use crate::adapters::http::AppState;

pub fn consultant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/conversations/:id/assign", post(assign_consultant))
        .route("/api/conversations/:id/close", post(close_conversation))
        .route("/api/conversations/:id/transcript", get(get_transcript))
}
