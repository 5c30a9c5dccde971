//! Configuration module for environment variable parsing.
//!
//! Everything is read from the environment. Optional values fall back to
//! defaults; the three WhatsApp secrets are only checked when a message is
//! actually sent, so the server starts even when they are absent.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::ConfigError;

pub const WHATSAPP_ACCESS_TOKEN: &str = "WHATSAPP_ACCESS_TOKEN";
pub const WHATSAPP_PHONE_NUMBER_ID: &str = "WHATSAPP_PHONE_NUMBER_ID";
pub const RECIPIENT_PHONE_NUMBER: &str = "RECIPIENT_PHONE_NUMBER";

pub const DEFAULT_API_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v19.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the WhatsApp Cloud API
    pub whatsapp_access_token: Option<String>,

    /// Sender phone number ID registered with WhatsApp Business
    pub whatsapp_phone_number_id: Option<String>,

    /// Recipient of every relayed message
    pub recipient_phone_number: Option<String>,

    /// Graph API origin, overridable for local testing
    pub whatsapp_api_base_url: String,

    /// Graph API version path segment
    pub whatsapp_api_version: String,

    /// Outbound request timeout in milliseconds; `None` waits indefinitely
    pub request_timeout_ms: Option<u64>,

    /// Port for the web server to listen on
    pub port: u16,
}

/// The three secrets needed to send a message, all present and non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct WhatsAppCredentials {
    pub access_token: String,
    pub phone_number_id: String,
    pub recipient: String,
}

impl fmt::Debug for WhatsAppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppCredentials")
            .field("access_token", &"<redacted>")
            .field("phone_number_id", &self.phone_number_id)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            whatsapp_access_token: read_secret(WHATSAPP_ACCESS_TOKEN),

            whatsapp_phone_number_id: read_secret(WHATSAPP_PHONE_NUMBER_ID),

            recipient_phone_number: read_secret(RECIPIENT_PHONE_NUMBER),

            whatsapp_api_base_url: parse_base_url("WHATSAPP_API_BASE_URL"),

            whatsapp_api_version: read_secret("WHATSAPP_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms| *ms > 0),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Resolve the credentials needed for one send.
    ///
    /// Every missing variable is reported, not just the first.
    pub fn whatsapp_credentials(&self) -> Result<WhatsAppCredentials, ConfigError> {
        match (
            &self.whatsapp_access_token,
            &self.whatsapp_phone_number_id,
            &self.recipient_phone_number,
        ) {
            (Some(access_token), Some(phone_number_id), Some(recipient)) => {
                Ok(WhatsAppCredentials {
                    access_token: access_token.clone(),
                    phone_number_id: phone_number_id.clone(),
                    recipient: recipient.clone(),
                })
            }
            _ => Err(ConfigError::MissingCredentials(
                self.credential_status()
                    .into_iter()
                    .filter(|(_, loaded)| !loaded)
                    .map(|(name, _)| name)
                    .collect(),
            )),
        }
    }

    /// Whether each required secret is loaded, keyed by variable name.
    pub fn credential_status(&self) -> [(&'static str, bool); 3] {
        [
            (RECIPIENT_PHONE_NUMBER, self.recipient_phone_number.is_some()),
            (WHATSAPP_PHONE_NUMBER_ID, self.whatsapp_phone_number_id.is_some()),
            (WHATSAPP_ACCESS_TOKEN, self.whatsapp_access_token.is_some()),
        ]
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "whatsapp_access_token",
                &self.whatsapp_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("whatsapp_phone_number_id", &self.whatsapp_phone_number_id)
            .field("recipient_phone_number", &self.recipient_phone_number)
            .field("whatsapp_api_base_url", &self.whatsapp_api_base_url)
            .field("whatsapp_api_version", &self.whatsapp_api_version)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("port", &self.port)
            .finish()
    }
}

/// Read a variable, treating blank values as unset.
fn read_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read an http(s) base URL, falling back to the public Graph API.
fn parse_base_url(name: &str) -> String {
    let raw = match read_secret(name) {
        Some(v) => v,
        None => return DEFAULT_API_BASE_URL.to_string(),
    };

    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => raw,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid base URL, using default");
            DEFAULT_API_BASE_URL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> Config {
        Config {
            whatsapp_access_token: Some("token".to_string()),
            whatsapp_phone_number_id: Some("1234567890".to_string()),
            recipient_phone_number: Some("15551234567".to_string()),
            whatsapp_api_base_url: DEFAULT_API_BASE_URL.to_string(),
            whatsapp_api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_ms: None,
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn test_read_secret_blank_is_unset() {
        env::set_var("TEST_RELAY_BLANK_SECRET", "   ");
        assert_eq!(read_secret("TEST_RELAY_BLANK_SECRET"), None);
        env::remove_var("TEST_RELAY_BLANK_SECRET");
    }

    #[test]
    fn test_read_secret_trims() {
        env::set_var("TEST_RELAY_SECRET", "  abc  ");
        assert_eq!(read_secret("TEST_RELAY_SECRET"), Some("abc".to_string()));
        env::remove_var("TEST_RELAY_SECRET");
    }

    #[test]
    fn test_parse_base_url_default() {
        assert_eq!(
            parse_base_url("TEST_RELAY_NONEXISTENT_URL"),
            DEFAULT_API_BASE_URL
        );
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        env::set_var("TEST_RELAY_BAD_URL", "not a url");
        assert_eq!(parse_base_url("TEST_RELAY_BAD_URL"), DEFAULT_API_BASE_URL);
        env::set_var("TEST_RELAY_BAD_URL", "ftp://example.com");
        assert_eq!(parse_base_url("TEST_RELAY_BAD_URL"), DEFAULT_API_BASE_URL);
        env::remove_var("TEST_RELAY_BAD_URL");
    }

    #[test]
    fn test_parse_base_url_custom() {
        env::set_var("TEST_RELAY_GOOD_URL", "http://127.0.0.1:9000");
        assert_eq!(
            parse_base_url("TEST_RELAY_GOOD_URL"),
            "http://127.0.0.1:9000"
        );
        env::remove_var("TEST_RELAY_GOOD_URL");
    }

    #[test]
    fn test_whatsapp_credentials_complete() {
        let creds = full_config().whatsapp_credentials().unwrap();
        assert_eq!(creds.access_token, "token");
        assert_eq!(creds.phone_number_id, "1234567890");
        assert_eq!(creds.recipient, "15551234567");
    }

    #[test]
    fn test_whatsapp_credentials_reports_all_missing() {
        let config = Config {
            whatsapp_access_token: None,
            recipient_phone_number: None,
            ..full_config()
        };

        assert_eq!(
            config.whatsapp_credentials(),
            Err(ConfigError::MissingCredentials(vec![
                RECIPIENT_PHONE_NUMBER,
                WHATSAPP_ACCESS_TOKEN
            ]))
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = full_config();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("\"token\""));
        assert!(rendered.contains("<redacted>"));

        let creds = config.whatsapp_credentials().unwrap();
        assert!(!format!("{:?}", creds).contains("\"token\""));
    }

    #[test]
    fn test_request_timeout() {
        assert_eq!(full_config().request_timeout(), None);

        let config = Config {
            request_timeout_ms: Some(2500),
            ..full_config()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(2500)));
    }
}
