//! Outbound client for the WhatsApp Cloud API.

use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::config::{Config, WhatsAppCredentials};
use crate::error::SendError;
use crate::whatsapp::types::{GraphErrorEnvelope, SendMessageResponse, TextMessage};

/// Result of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// `wamid.*` identifier assigned by WhatsApp, when the body carried one
    pub message_id: Option<String>,
}

/// Thin wrapper around a shared `reqwest::Client`.
///
/// Each send is a single POST. Nothing is retried.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    base_url: Url,
    api_version: String,
}

impl WhatsAppClient {
    /// Create a client for the given Graph API origin and version.
    pub fn new(
        base_url: &str,
        api_version: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SendError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SendError::InvalidEndpoint(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SendError::InvalidEndpoint(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            api_version: api_version.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SendError> {
        Self::new(
            &config.whatsapp_api_base_url,
            config.whatsapp_api_version.clone(),
            config.request_timeout(),
        )
    }

    /// `{base}/{version}/{phone_number_id}/messages`
    pub fn messages_url(&self, phone_number_id: &str) -> Result<Url, SendError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SendError::InvalidEndpoint(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push(&self.api_version)
                .push(phone_number_id)
                .push("messages");
        }
        Ok(url)
    }

    /// Send `body` as a plain text message to the configured recipient.
    pub async fn send_text(
        &self,
        credentials: &WhatsAppCredentials,
        body: &str,
    ) -> Result<SentMessage, SendError> {
        let url = self.messages_url(&credentials.phone_number_id)?;
        let payload = TextMessage::new(&credentials.recipient, body);

        info!(
            phone_number_id = %credentials.phone_number_id,
            body_length = body.len(),
            "whatsapp_send_starting"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&credentials.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(SendError::Upstream {
                status: status.as_u16(),
                message: provider_error_message(&raw),
            });
        }

        // A 2xx is a delivered message even if the body is unexpected.
        let message_id = match response.json::<SendMessageResponse>().await {
            Ok(parsed) => parsed.first_message_id(),
            Err(e) => {
                warn!(error = %e, "whatsapp_send_response_unparsed");
                None
            }
        };

        info!(
            status_code = status.as_u16(),
            message_id = message_id.as_deref().unwrap_or(""),
            "whatsapp_send_complete"
        );

        Ok(SentMessage { message_id })
    }
}

/// Pull `error.message` out of a Graph API error body, falling back to the raw text.
fn provider_error_message(raw: &str) -> String {
    match serde_json::from_str::<GraphErrorEnvelope>(raw) {
        Ok(envelope) => envelope.error.message,
        Err(_) if raw.trim().is_empty() => "empty response body".to_string(),
        Err(_) => raw.chars().take(500).collect(),
    }
}
