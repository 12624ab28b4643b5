//! Conversation domain module.
//!
//! The conversation aggregate, its dialogue state and lifecycle status,
//! recorded answers and the logged messages.

mod conversation;
mod message;
mod selections;
mod state;
mod status;

pub use conversation::Conversation;
pub use message::{Direction, Message, MessageKind, MessageMetadata, OPTIONS, PROVIDER_MESSAGE_ID};
pub use selections::{Selections, Step};
pub use state::DialogueState;
pub use status::ConversationStatus;
