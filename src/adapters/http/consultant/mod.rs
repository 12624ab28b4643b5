//! HTTP adapter for back-office conversation endpoints.
//!
//! - `POST /api/conversations/:id/assign` - hand a waiting conversation to a consultant
//! - `POST /api/conversations/:id/close` - complete a conversation
//! - `GET /api/conversations/:id/transcript` - conversation and its messages

mod dto;
mod handlers;
mod routes;

pub use dto::{AssignConsultantRequest, ConversationView, MessageView, TranscriptQuery, TranscriptView};
pub use handlers::{assign_consultant, close_conversation, get_transcript};
pub use routes::consultant_routes;
