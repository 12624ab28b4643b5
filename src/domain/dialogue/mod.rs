//! Dialogue domain module.
//!
//! The intake flow itself: given a conversation and one inbound text,
//! decide the next state and what to send back. No I/O happens here.

mod flow;
pub mod prompts;
mod summary;

pub use flow::{DialogueFlow, Outcome, OutboundMessage, Transition, DEFAULT_UTC_OFFSET_HOURS};
pub use summary::render_summary;
