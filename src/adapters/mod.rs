//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dialogue engine to external systems:
//! - `memory` - In-memory stores and a recording channel
//! - `postgres` - PostgreSQL-backed stores
//! - `whatsapp` - WhatsApp Cloud API delivery and webhook payloads
//! - `http` - axum router exposing the webhook and back-office endpoints

pub mod http;
pub mod memory;
pub mod postgres;
pub mod whatsapp;

pub use self::http::{app_router, AppState};
pub use memory::{
    InMemoryConversationStore, InMemoryMessageLog, InMemoryProcessedMessageStore,
    RecordingChannel,
};
pub use postgres::{PostgresConversationStore, PostgresMessageLog, PostgresProcessedMessageStore};
pub use whatsapp::{CloudApiConfig, WhatsAppCloudChannel};
