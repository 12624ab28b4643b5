//! ProcessedMessageStore port - redelivery tracking for inbound webhooks.
//!
//! The messaging provider retries deliveries it considers unacknowledged, so
//! the same inbound message can arrive more than once. Each provider message
//! id is recorded once its processing succeeded, and later deliveries of the
//! same id are skipped.
//!
//! ```ignore
//! if store.contains(&provider_id).await? {
//!     return Ok(()); // duplicate
//! }
//! engine.handle_inbound(identity, text).await?;
//! store.mark_processed(&provider_id).await?;
//! ```

use async_trait::async_trait;

use super::StoreError;
use crate::domain::foundation::Timestamp;

#[async_trait]
pub trait ProcessedMessageStore: Send + Sync {
    /// Returns `true` if this provider message id was already handled.
    async fn contains(&self, provider_message_id: &str) -> Result<bool, StoreError>;

    /// Record the id. Call AFTER successful handling so failures are retried.
    async fn mark_processed(&self, provider_message_id: &str) -> Result<(), StoreError>;

    /// Forget ids recorded before `timestamp`. Returns how many were removed.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, StoreError>;
}
