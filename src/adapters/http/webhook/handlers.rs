//! Webhook handlers.
//!
//! Notifications are acknowledged as soon as they are decoded; the messages
//! they carry are queued on the dispatcher and processed in the background.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::adapters::http::AppState;
use crate::adapters::whatsapp::WebhookPayload;

/// Query string of the verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,

    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,

    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook - echo the challenge when mode and token match.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> impl IntoResponse {
    let token_matches = query.verify_token.as_deref() == Some(&*state.webhook_verify_token);

    if query.mode.as_deref() == Some("subscribe") && token_matches {
        tracing::info!("Webhook verified");
        (StatusCode::OK, query.challenge.unwrap_or_default())
    } else {
        tracing::warn!(mode = ?query.mode, "Webhook verification failed");
        (StatusCode::FORBIDDEN, "Verification failed".to_string())
    }
}

/// POST /webhook - decode, queue text messages, acknowledge.
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Malformed webhook payload: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    let messages = payload.inbound_messages();
    tracing::debug!(count = messages.len(), "Webhook notification received");

    for message in messages {
        tracing::info!(identity = %message.identity, "Inbound message queued");
        state.dispatcher.dispatch(message);
    }

    StatusCode::OK
}
