//! In-memory ConversationStore.
//!
//! Useful for tests and for running the bot locally without Postgres.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, Identity};
use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations, any status.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// All conversations ever created for an identity.
    pub async fn all_for_identity(&self, identity: &Identity) -> Vec<Conversation> {
        let mut found: Vec<_> = self
            .conversations
            .read()
            .await
            .values()
            .filter(|c| c.identity() == identity)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.started_at());
        found
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find_active_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<Conversation>, StoreError> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .values()
            .find(|c| c.is_active() && c.identity() == identity)
            .cloned())
    }

    async fn create(&self, conversation: &Conversation) -> Result<ConversationId, StoreError> {
        let mut conversations = self.conversations.write().await;
        if conversation.is_active()
            && conversations
                .values()
                .any(|c| c.is_active() && c.identity() == conversation.identity())
        {
            return Err(StoreError::AlreadyActive(conversation.identity().to_string()));
        }
        conversations.insert(conversation.id(), conversation.clone());
        Ok(conversation.id())
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        let stored = conversations
            .get(&conversation.id())
            .ok_or_else(|| StoreError::NotFound(format!("conversation {}", conversation.id())))?;
        if stored.version() != conversation.version() {
            return Err(StoreError::Conflict(format!("conversation {}", conversation.id())));
        }
        conversations.insert(conversation.id(), conversation.with_next_version());
        Ok(())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::DialogueState;
    use crate::domain::foundation::Timestamp;

    fn identity() -> Identity {
        Identity::parse("5511999999999").unwrap()
    }

    #[tokio::test]
    async fn create_then_find_active() {
        let store = InMemoryConversationStore::new();
        let conv = Conversation::new(identity(), Timestamp::now());

        let id = store.create(&conv).await.unwrap();

        assert_eq!(id, conv.id());
        let found = store.find_active_by_identity(&identity()).await.unwrap();
        assert_eq!(found, Some(conv));
    }

    #[tokio::test]
    async fn create_refuses_second_active_conversation() {
        let store = InMemoryConversationStore::new();
        store.create(&Conversation::new(identity(), Timestamp::now())).await.unwrap();

        let result = store.create(&Conversation::new(identity(), Timestamp::now())).await;

        assert!(matches!(result, Err(StoreError::AlreadyActive(_))));
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryConversationStore::new();
        let mut conv = Conversation::new(identity(), Timestamp::now());
        store.create(&conv).await.unwrap();

        conv.advance_to(DialogueState::MainMenu, Timestamp::now()).unwrap();
        store.update(&conv).await.unwrap();

        let stored = store.find_by_id(&conv.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 1);
        assert_eq!(stored.state(), DialogueState::MainMenu);
    }

    #[tokio::test]
    async fn stale_update_conflicts() {
        let store = InMemoryConversationStore::new();
        let conv = Conversation::new(identity(), Timestamp::now());
        store.create(&conv).await.unwrap();

        let mut first = conv.clone();
        first.advance_to(DialogueState::MainMenu, Timestamp::now()).unwrap();
        store.update(&first).await.unwrap();

        // Still carries version 0
        let result = store.update(&conv).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_unknown_conversation_is_not_found() {
        let store = InMemoryConversationStore::new();
        let result = store.update(&Conversation::new(identity(), Timestamp::now())).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn completed_conversation_is_not_active() {
        let store = InMemoryConversationStore::new();
        let mut conv = Conversation::new(identity(), Timestamp::now());
        store.create(&conv).await.unwrap();

        conv.complete(Timestamp::now()).unwrap();
        store.update(&conv).await.unwrap();

        assert_eq!(store.find_active_by_identity(&identity()).await.unwrap(), None);
        store.create(&Conversation::new(identity(), Timestamp::now())).await.unwrap();
        assert_eq!(store.all_for_identity(&identity()).await.len(), 2);
    }
}
