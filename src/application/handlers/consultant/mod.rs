//! Consultant handlers - back-office operations after the handoff.

mod assign_consultant;
mod close_conversation;
mod errors;
mod get_transcript;

pub use assign_consultant::{AssignConsultantCommand, AssignConsultantHandler};
pub use close_conversation::{CloseConversationCommand, CloseConversationHandler};
pub use errors::ConsultantError;
pub use get_transcript::{GetTranscriptHandler, GetTranscriptQuery, Transcript};
