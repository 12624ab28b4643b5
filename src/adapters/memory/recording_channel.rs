//! OutboundChannel that keeps what it was asked to send.
//!
//! Stands in for the WhatsApp client when no access token is configured,
//! and lets tests assert on exactly what the user would have received.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Identity;
use crate::ports::{ChannelError, OutboundChannel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text { to: Identity, text: String },
    Choices { to: Identity, text: String, options: Vec<String> },
}

impl SentMessage {
    pub fn to(&self) -> &Identity {
        match self {
            Self::Text { to, .. } | Self::Choices { to, .. } => to,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } | Self::Choices { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    sent: Arc<RwLock<Vec<SentMessage>>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn sent_to(&self, identity: &Identity) -> Vec<SentMessage> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.to() == identity)
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl OutboundChannel for RecordingChannel {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), ChannelError> {
        tracing::debug!(to = %to, "recording outbound text");
        self.sent.write().await.push(SentMessage::Text {
            to: to.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_choices(
        &self,
        to: &Identity,
        text: &str,
        options: &[String],
    ) -> Result<(), ChannelError> {
        tracing::debug!(to = %to, options = options.len(), "recording outbound choices");
        self.sent.write().await.push(SentMessage::Choices {
            to: to.clone(),
            text: text.to_string(),
            options: options.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_in_order_per_identity() {
        let channel = RecordingChannel::new();
        let ana = Identity::parse("5511999999999").unwrap();
        let bia = Identity::parse("5521988888888").unwrap();

        channel.send_text(&ana, "oi").await.unwrap();
        channel.send_choices(&bia, "menu", &["1- A".to_string()]).await.unwrap();
        channel.send_text(&ana, "tchau").await.unwrap();

        let to_ana: Vec<_> = channel.sent_to(&ana).await.iter().map(|m| m.text().to_string()).collect();
        assert_eq!(to_ana, vec!["oi", "tchau"]);
        assert_eq!(channel.sent().await.len(), 3);
    }
}
