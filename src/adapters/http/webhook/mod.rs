//! HTTP adapter for the WhatsApp webhook.
//!
//! - `GET /webhook` - subscription verification handshake
//! - `POST /webhook` - message notifications

mod handlers;
mod routes;

pub use handlers::{receive_webhook, verify_webhook, VerifyQuery};
pub use routes::webhook_routes;
