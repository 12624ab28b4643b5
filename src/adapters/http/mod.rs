//! HTTP adapters - the service's REST surface.
//!
//! - `webhook` - WhatsApp verification handshake and notifications
//! - `consultant` - back-office conversation operations
//! - `health` - liveness and readiness

pub mod consultant;
mod error;
pub mod health;
mod state;
pub mod webhook;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Builds the complete application router with middleware.
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(webhook::webhook_routes())
        .merge(consultant::consultant_routes())
        .merge(health::health_routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::{
        InMemoryConversationStore, InMemoryMessageLog, InMemoryProcessedMessageStore,
        RecordingChannel,
    };
    use crate::application::{DialogueEngine, EngineConfig, InboundDispatcher};
    use crate::domain::dialogue::DialogueFlow;

    fn test_state() -> AppState {
        let conversations = Arc::new(InMemoryConversationStore::new());
        let messages = Arc::new(InMemoryMessageLog::new());
        let engine = Arc::new(DialogueEngine::new(
            conversations.clone(),
            messages.clone(),
            Arc::new(RecordingChannel::new()),
            EngineConfig::new(DialogueFlow::default()),
        ));
        let dispatcher = Arc::new(InboundDispatcher::new(
            engine,
            Arc::new(InMemoryProcessedMessageStore::new()),
            Duration::from_secs(5),
        ));
        AppState {
            conversations,
            messages,
            dispatcher,
            webhook_verify_token: Arc::from("verify-me"),
        }
    }

    fn router() -> Router {
        app_router(test_state(), Duration::from_secs(5))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let response = router()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "pong");
    }

    #[tokio::test]
    async fn ping_answers_head() {
        let response = router()
            .oneshot(Request::builder().method(Method::HEAD).uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_healthy_store() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "up");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = router()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_conversation_id_format_is_bad_request() {
        let response = router()
            .oneshot(
                Request::post("/api/conversations/not-a-uuid/close")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
