//! AssignConsultantHandler - hands a waiting conversation to a human.

use std::sync::Arc;

use super::ConsultantError;
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConsultantId, ConversationId, Timestamp};
use crate::ports::ConversationStore;

#[derive(Debug, Clone)]
pub struct AssignConsultantCommand {
    pub conversation_id: ConversationId,
    pub consultant_id: ConsultantId,
}

pub struct AssignConsultantHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl AssignConsultantHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    pub async fn handle(&self, cmd: AssignConsultantCommand) -> Result<Conversation, ConsultantError> {
        let mut conversation = self
            .conversations
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(ConsultantError::NotFound(cmd.conversation_id))?;

        conversation.assign_consultant(cmd.consultant_id.clone(), Timestamp::now())?;
        self.conversations.update(&conversation).await?;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            consultant_id = %cmd.consultant_id,
            "consultant assigned"
        );
        Ok(conversation.with_next_version())
    }
}
