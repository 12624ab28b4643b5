//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and error types
//! used across the intake domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConsultantId, ConversationId, Identity, MessageId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
