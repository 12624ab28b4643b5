//! WhatsApp Cloud API configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// WhatsApp configuration
///
/// Outbound delivery is enabled only when both `phone_number_id` and
/// `access_token` are set; otherwise replies are kept in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Graph API version, without the leading `v`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Bearer token for the Graph API
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Shared secret echoed by the provider during webhook verification
    #[serde(default)]
    pub webhook_verify_token: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl WhatsAppConfig {
    /// Phone number id and access token, when both are present.
    pub fn credentials(&self) -> Option<(&str, &SecretString)> {
        let phone_number_id = self
            .phone_number_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;
        let token = self
            .access_token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())?;
        Some((phone_number_id, token))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate WhatsApp configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.webhook_verify_token.trim().is_empty() {
            return Err(ValidationError::MissingRequired("WHATSAPP__WEBHOOK_VERIFY_TOKEN"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("whatsapp.timeout_secs"));
        }
        if production {
            if self.credentials().is_none() {
                return Err(ValidationError::MissingRequired(
                    "WHATSAPP__PHONE_NUMBER_ID and WHATSAPP__ACCESS_TOKEN",
                ));
            }
            if !self.base_url.starts_with("https://") {
                return Err(ValidationError::BaseUrlMustBeHttps);
            }
        }
        Ok(())
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            base_url: default_base_url(),
            phone_number_id: None,
            access_token: None,
            webhook_verify_token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_version() -> String {
    "18.0".to_string()
}

fn default_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
