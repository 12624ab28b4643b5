//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue engine and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Conversation aggregates with versioned updates
//! - `MessageLog` - Append-only record of every message exchanged
//! - `OutboundChannel` - Delivery of bot replies to the user
//! - `ProcessedMessageStore` - Idempotency tracking for webhook redeliveries

mod conversation_store;
mod message_log;
mod outbound_channel;
mod processed_message_store;

pub use conversation_store::{ConversationStore, StoreError};
pub use message_log::MessageLog;
pub use outbound_channel::{ChannelError, OutboundChannel};
pub use processed_message_store::ProcessedMessageStore;
