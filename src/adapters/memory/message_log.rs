//! In-memory MessageLog.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Message;
use crate::domain::foundation::ConversationId;
use crate::ports::{MessageLog, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message appended so far, in append order.
    pub async fn all(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        let mut found: Vec<_> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep append order
        found.sort_by_key(|m| m.timestamp);
        Ok(found)
    }

    async fn find_latest_by_conversation(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let mut found = self.find_by_conversation(conversation_id).await?;
        found.reverse();
        found.truncate(limit);
        Ok(found)
    }
}
