//! WhatsApp webhook payload types.
//!
//! These types mirror the Cloud API notification JSON closely enough to
//! parse real deliveries, and convert the text messages they carry into
//! `InboundMessage`s. Status updates, media, and unknown fields are ignored.

use serde::Deserialize;

use crate::application::InboundMessage;
use crate::domain::foundation::Identity;

/// The only `object` value that carries WhatsApp messages.
pub const BUSINESS_ACCOUNT_OBJECT: &str = "whatsapp_business_account";

/// Top-level webhook notification.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,

    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: String,

    pub value: ChangeValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: Option<String>,

    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

/// One message as delivered by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    /// Provider message id, stable across redeliveries.
    pub id: String,

    pub from: String,

    #[serde(rename = "type")]
    pub message_type: String,

    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub body: String,
}

impl WebhookPayload {
    pub fn is_business_account(&self) -> bool {
        self.object == BUSINESS_ACCOUNT_OBJECT
    }

    /// Text messages in delivery order.
    ///
    /// Messages of other types, messages without a body, and senders that
    /// are not valid identities are skipped with a log line.
    pub fn inbound_messages(&self) -> Vec<InboundMessage> {
        if !self.is_business_account() {
            tracing::warn!(object = %self.object, "ignoring non-WhatsApp webhook");
            return Vec::new();
        }

        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .filter(|change| change.field == "messages")
            .flat_map(|change| change.value.messages.iter())
            .filter_map(WebhookMessage::to_inbound)
            .collect()
    }
}

impl WebhookMessage {
    fn to_inbound(&self) -> Option<InboundMessage> {
        if self.message_type != "text" {
            tracing::info!(message_id = %self.id, kind = %self.message_type, "ignoring non-text message");
            return None;
        }

        let Some(text) = &self.text else {
            tracing::warn!(message_id = %self.id, "text message without body");
            return None;
        };

        let sender = self.from.trim().trim_start_matches('+');
        match Identity::parse(sender) {
            Ok(identity) => Some(
                InboundMessage::new(identity, text.body.clone()).with_provider_message_id(&self.id),
            ),
            Err(e) => {
                tracing::warn!(message_id = %self.id, "invalid sender: {}", e);
                None
            }
        }
    }
}
