//! Application layer - Commands, Queries, Handlers and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod dispatcher;
pub mod handlers;
pub mod pruner;

pub use dispatcher::{InboundDispatcher, InboundMessage, DEFAULT_WORKER_IDLE};
pub use handlers::{
    AssignConsultantCommand, AssignConsultantHandler, CloseConversationCommand,
    CloseConversationHandler, ConsultantError, DialogueEngine, DialogueError, EngineConfig,
    GetTranscriptHandler, GetTranscriptQuery, HandleInboundCommand, HandleInboundResult,
    Transcript,
};
pub use pruner::{ProcessedMessagePruner, PrunerConfig};
