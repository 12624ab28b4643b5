//! HTTP DTOs for back-office endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::Transcript;
use crate::domain::conversation::{Conversation, Message, MessageMetadata};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct AssignConsultantRequest {
    pub consultant_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptQuery {
    /// Only the most recent `n` messages.
    pub latest: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: String,
    pub identity: String,
    pub status: String,
    pub state: String,
    /// Answers keyed by step, in flow order.
    pub selections: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<String>,
    pub started_at: String,
    pub last_updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub version: u64,
}

impl From<&Conversation> for ConversationView {
    fn from(conv: &Conversation) -> Self {
        Self {
            id: conv.id().to_string(),
            identity: conv.identity().to_string(),
            status: conv.status().as_str().to_string(),
            state: conv.state().as_str().to_string(),
            selections: conv
                .selections()
                .iter()
                .map(|(step, answer)| (step.key().to_string(), answer.to_string()))
                .collect(),
            consultant_id: conv.consultant_id().map(|c| c.as_str().to_string()),
            started_at: conv.started_at().as_datetime().to_rfc3339(),
            last_updated_at: conv.last_updated_at().as_datetime().to_rfc3339(),
            ended_at: conv.ended_at().map(|t| t.as_datetime().to_rfc3339()),
            version: conv.version(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: String,
    pub direction: String,
    pub kind: String,
    pub content: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: MessageMetadata,
}

impl From<&Message> for MessageView {
    fn from(msg: &Message) -> Self {
        Self {
            id: msg.id.to_string(),
            direction: msg.direction.as_str().to_string(),
            kind: msg.kind.as_str().to_string(),
            content: msg.content.clone(),
            timestamp: msg.timestamp.as_datetime().to_rfc3339(),
            metadata: msg.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptView {
    pub conversation: ConversationView,
    pub messages: Vec<MessageView>,
}

impl From<&Transcript> for TranscriptView {
    fn from(transcript: &Transcript) -> Self {
        Self {
            conversation: ConversationView::from(&transcript.conversation),
            messages: transcript.messages.iter().map(MessageView::from).collect(),
        }
    }
}
