//! Dialogue handlers - processing inbound user messages.

mod handle_inbound;

pub use handle_inbound::{
    DialogueEngine, DialogueError, EngineConfig, HandleInboundCommand, HandleInboundResult,
    DEFAULT_MAX_CONFLICT_ATTEMPTS,
};
