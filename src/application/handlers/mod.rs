//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod consultant;
pub mod dialogue;

pub use consultant::{
    AssignConsultantCommand, AssignConsultantHandler, CloseConversationCommand,
    CloseConversationHandler, ConsultantError, GetTranscriptHandler, GetTranscriptQuery,
    Transcript,
};
pub use dialogue::{
    DialogueEngine, DialogueError, EngineConfig, HandleInboundCommand, HandleInboundResult,
};
