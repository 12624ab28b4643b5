//! In-memory adapters for every port.
//!
//! Backed by `Arc<RwLock<..>>`, cloneable, and safe to share between tasks.
//! Data is lost on restart.

mod conversation_store;
mod message_log;
mod processed_message_store;
mod recording_channel;

pub use conversation_store::InMemoryConversationStore;
pub use message_log::InMemoryMessageLog;
pub use processed_message_store::InMemoryProcessedMessageStore;
pub use recording_channel::{RecordingChannel, SentMessage};
