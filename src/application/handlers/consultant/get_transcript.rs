//! GetTranscriptHandler - a conversation with its message history.

use std::sync::Arc;

use super::ConsultantError;
use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, MessageLog};

#[derive(Debug, Clone)]
pub struct GetTranscriptQuery {
    pub conversation_id: ConversationId,
    /// Only the most recent `n` messages when set.
    pub latest: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub conversation: Conversation,
    /// Oldest first.
    pub messages: Vec<Message>,
}

pub struct GetTranscriptHandler {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageLog>,
}

impl GetTranscriptHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>, messages: Arc<dyn MessageLog>) -> Self {
        Self {
            conversations,
            messages,
        }
    }

    pub async fn handle(&self, query: GetTranscriptQuery) -> Result<Transcript, ConsultantError> {
        let conversation = self
            .conversations
            .find_by_id(&query.conversation_id)
            .await?
            .ok_or(ConsultantError::NotFound(query.conversation_id))?;

        let messages = match query.latest {
            Some(limit) => {
                let mut latest = self
                    .messages
                    .find_latest_by_conversation(&query.conversation_id, limit)
                    .await?;
                latest.reverse();
                latest
            }
            None => self.messages.find_by_conversation(&query.conversation_id).await?,
        };

        Ok(Transcript {
            conversation,
            messages,
        })
    }
}
