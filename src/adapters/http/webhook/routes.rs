use axum::routing::get;
use axum::Router;

use super::handlers::{receive_webhook, verify_webhook};
use crate::adapters::http::AppState;

/// Both verbs share one path, as the provider expects.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhook", get(verify_webhook).post(receive_webhook))
}
