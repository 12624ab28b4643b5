//! Logged chat messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ConversationId, Identity, MessageId, Timestamp, ValidationError};

/// Metadata key for the provider's id of an inbound message.
pub const PROVIDER_MESSAGE_ID: &str = "provider_message_id";
/// Metadata key for the option list of an outbound choice message.
pub const OPTIONS: &str = "options";

/// Who sent the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            other => Err(ValidationError::invalid_format(
                "direction",
                format!("unknown direction '{other}'"),
            )),
        }
    }
}

/// Content type of the message as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Document,
    Location,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Document => "document",
            Self::Location => "location",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            "location" => Ok(Self::Location),
            other => Err(ValidationError::invalid_format(
                "message_kind",
                format!("unknown message kind '{other}'"),
            )),
        }
    }
}

pub type MessageMetadata = BTreeMap<String, serde_json::Value>;

/// One inbound or outbound message. Never updated after it is logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub identity: Identity,
    pub content: String,
    pub direction: Direction,
    pub kind: MessageKind,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl Message {
    /// A text the user sent us.
    pub fn inbound(
        conversation_id: ConversationId,
        identity: Identity,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self::build(conversation_id, identity, content, Direction::Inbound, timestamp)
    }

    /// A text we sent the user.
    pub fn outbound(
        conversation_id: ConversationId,
        identity: Identity,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self::build(conversation_id, identity, content, Direction::Outbound, timestamp)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    fn build(
        conversation_id: ConversationId,
        identity: Identity,
        content: impl Into<String>,
        direction: Direction,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            identity,
            content: content.into(),
            direction,
            kind: MessageKind::Text,
            timestamp,
            metadata: MessageMetadata::new(),
        }
    }
}
