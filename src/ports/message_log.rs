//! Message log port - append-only audit trail of the chat.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::conversation::Message;
use crate::domain::foundation::ConversationId;

#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append one message. Messages are never updated or deleted.
    async fn append(&self, message: &Message) -> Result<(), StoreError>;

    /// All messages of a conversation, oldest first. Messages with equal
    /// timestamps come back in the order they were appended.
    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, StoreError>;

    /// The `limit` most recent messages of a conversation, newest first.
    async fn find_latest_by_conversation(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;
}
