//! WhatsApp Cloud API outbound channel.
//!
//! Implements `OutboundChannel` by posting text messages to
//! `{base_url}/v{api_version}/{phone_number_id}/messages`.
//!
//! ```ignore
//! let config = CloudApiConfig::new("1234567890", access_token);
//! let channel = WhatsAppCloudChannel::new(config)?;
//! channel.send_text(&identity, "Olá!").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::Identity;
use crate::ports::{ChannelError, OutboundChannel};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
const DEFAULT_API_VERSION: &str = "18.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cloud API connection settings.
#[derive(Clone)]
pub struct CloudApiConfig {
    base_url: String,
    api_version: String,
    phone_number_id: String,
    access_token: SecretString,
    timeout: Duration,
}

impl CloudApiConfig {
    pub fn new(phone_number_id: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            phone_number_id: phone_number_id.into(),
            access_token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v{}/{}/messages",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.phone_number_id
        )
    }
}

impl std::fmt::Debug for CloudApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudApiConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

impl<'a> TextMessageRequest<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            message_type: "text",
            text: TextBody { body },
        }
    }
}

/// Renders a prompt and its options as one text body.
pub(crate) fn render_choices(text: &str, options: &[String]) -> String {
    if options.is_empty() {
        return text.to_string();
    }
    format!("{}\n\n{}", text, options.join("\n"))
}

/// WhatsApp Cloud API adapter.
pub struct WhatsAppCloudChannel {
    config: CloudApiConfig,
    http_client: reqwest::Client,
}

impl WhatsAppCloudChannel {
    pub fn new(config: CloudApiConfig) -> Result<Self, ChannelError> {
        if config.phone_number_id.trim().is_empty() {
            return Err(ChannelError::Invalid("phone number id not configured".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChannelError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn post_text(&self, to: &Identity, body: &str) -> Result<(), ChannelError> {
        let request = TextMessageRequest::new(to.as_str(), body);

        let response = self
            .http_client
            .post(self.config.messages_url())
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(to = %to, status = status.as_u16(), "WhatsApp API rejected message");
            return Err(ChannelError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %to, "WhatsApp message sent");
        Ok(())
    }
}

fn map_transport_error(err: reqwest::Error) -> ChannelError {
    if err.is_timeout() {
        ChannelError::Unavailable(format!("request timed out: {}", err))
    } else if err.is_connect() {
        ChannelError::Unavailable(format!("connection failed: {}", err))
    } else {
        ChannelError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl OutboundChannel for WhatsAppCloudChannel {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), ChannelError> {
        self.post_text(to, text).await
    }

    async fn send_choices(
        &self,
        to: &Identity,
        text: &str,
        options: &[String],
    ) -> Result<(), ChannelError> {
        self.post_text(to, &render_choices(text, options)).await
    }
}
