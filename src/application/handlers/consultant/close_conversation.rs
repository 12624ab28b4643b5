//! CloseConversationHandler - marks a conversation completed.
//!
//! The next message from the same identity starts a fresh conversation.

use std::sync::Arc;

use super::ConsultantError;
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::ConversationStore;

#[derive(Debug, Clone)]
pub struct CloseConversationCommand {
    pub conversation_id: ConversationId,
}

pub struct CloseConversationHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl CloseConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    pub async fn handle(&self, cmd: CloseConversationCommand) -> Result<Conversation, ConsultantError> {
        let mut conversation = self
            .conversations
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(ConsultantError::NotFound(cmd.conversation_id))?;

        conversation.complete(Timestamp::now())?;
        self.conversations.update(&conversation).await?;

        tracing::info!(conversation_id = %cmd.conversation_id, "conversation closed");
        Ok(conversation.with_next_version())
    }
}
