//! WhatsApp Cloud API adapters.
//!
//! - `WhatsAppCloudChannel` - outbound delivery over the Graph API
//! - `webhook_types` - typed inbound webhook payloads

mod cloud_channel;
pub mod webhook_types;

pub use cloud_channel::{CloudApiConfig, WhatsAppCloudChannel};
pub use webhook_types::WebhookPayload;
