//! Outbound channel port - delivers bot messages to the user.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Identity;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// Provider could not be reached or timed out.
    #[error("channel unavailable: {0}")]
    Unavailable(String),

    /// Provider answered but refused the message.
    #[error("message rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Local failure before anything was sent.
    #[error("invalid outbound message: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait OutboundChannel: Send + Sync {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), ChannelError>;

    /// Sends `text` followed by an ordered list of options.
    async fn send_choices(
        &self,
        to: &Identity,
        text: &str,
        options: &[String],
    ) -> Result<(), ChannelError>;
}
