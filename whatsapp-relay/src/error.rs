//! Error types for configuration lookup and outbound delivery.

use thiserror::Error;

/// Configuration is incomplete for sending a message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

/// Delivery to the WhatsApp Cloud API failed.
#[derive(Debug, Error)]
pub enum SendError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("failed to reach WhatsApp API: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("WhatsApp API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid WhatsApp API endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SendError {
    /// HTTP status returned by the provider, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SendError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_every_name() {
        let err = ConfigError::MissingCredentials(vec!["A_TOKEN", "B_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: A_TOKEN, B_ID"
        );
    }

    #[test]
    fn test_upstream_status() {
        let err = SendError::Upstream {
            status: 401,
            message: "Invalid OAuth access token.".to_string(),
        };
        assert_eq!(err.upstream_status(), Some(401));
        assert!(err.to_string().contains("Invalid OAuth access token."));

        let err = SendError::InvalidEndpoint("relative URL without a base".to_string());
        assert_eq!(err.upstream_status(), None);
    }
}
