use thiserror::Error;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::ports::StoreError;

/// Errors from back-office operations on a conversation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsultantError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conversation changed concurrently, reload and retry")]
    Conflict,

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<DomainError> for ConsultantError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition | ErrorCode::ConversationClosed => {
                ConsultantError::InvalidState(err.message)
            }
        }
    }
}

impl From<StoreError> for ConsultantError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ConsultantError::Conflict,
            other => ConsultantError::Repository(other.to_string()),
        }
    }
}
