//! Conversation store port.
//!
//! Loads and persists Conversation aggregates keyed by user identity.
//!
//! # Concurrency
//!
//! `update` is a conditional write: it succeeds only when the stored version
//! equals `conversation.version()`, and bumps the stored version by one.
//! A mismatch yields `StoreError::Conflict`, letting the caller reload and
//! recompute instead of overwriting a newer transition.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, Identity};

/// Failures shared by the persistence ports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("version conflict on {0}")]
    Conflict(String),

    #[error("an active conversation already exists for {0}")]
    AlreadyActive(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Repository port for Conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The conversation with `status = Active` for this identity, if any.
    async fn find_active_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Persist a new conversation and return its id.
    ///
    /// # Errors
    ///
    /// - `AlreadyActive` if another active conversation exists for the identity
    async fn create(&self, conversation: &Conversation) -> Result<ConversationId, StoreError>;

    /// Conditionally overwrite a stored conversation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no conversation has this id
    /// - `Conflict` if the stored version differs from `conversation.version()`
    async fn update(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Find a conversation by id, whatever its status.
    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ConversationStore) {}
    }

    #[test]
    fn errors_display_their_subject() {
        assert_eq!(
            StoreError::Conflict("conversation 42".into()).to_string(),
            "version conflict on conversation 42"
        );
    }
}
