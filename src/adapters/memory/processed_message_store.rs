//! In-memory ProcessedMessageStore.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{ProcessedMessageStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProcessedMessageStore {
    processed: Arc<RwLock<HashMap<String, Timestamp>>>,
}

impl InMemoryProcessedMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.processed.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.processed.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessedMessageStore for InMemoryProcessedMessageStore {
    async fn contains(&self, provider_message_id: &str) -> Result<bool, StoreError> {
        Ok(self.processed.read().await.contains_key(provider_message_id))
    }

    async fn mark_processed(&self, provider_message_id: &str) -> Result<(), StoreError> {
        self.processed
            .write()
            .await
            .entry(provider_message_id.to_string())
            .or_insert_with(Timestamp::now);
        Ok(())
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, StoreError> {
        let mut processed = self.processed.write().await;
        let before = processed.len();
        processed.retain(|_, at| !at.is_before(&timestamp));
        Ok((before - processed.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn marks_and_detects_ids() {
        let store = InMemoryProcessedMessageStore::new();
        assert!(!store.contains("wamid.1").await.unwrap());

        store.mark_processed("wamid.1").await.unwrap();

        assert!(store.contains("wamid.1").await.unwrap());
        assert!(!store.contains("wamid.2").await.unwrap());
    }

    #[tokio::test]
    async fn marking_twice_keeps_one_entry() {
        let store = InMemoryProcessedMessageStore::new();
        store.mark_processed("wamid.1").await.unwrap();
        store.mark_processed("wamid.1").await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_before_removes_old_entries() {
        let store = InMemoryProcessedMessageStore::new();
        store.mark_processed("wamid.1").await.unwrap();

        let removed = store.delete_before(Timestamp::now().plus_secs(1)).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.is_empty().await);
    }
}
