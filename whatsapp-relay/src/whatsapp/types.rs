//! Wire types for the WhatsApp Cloud API `messages` endpoint.

use serde::{Deserialize, Serialize};

/// Outbound text message payload.
#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct TextBody<'a> {
    pub preview_url: bool,
    pub body: &'a str,
}

impl<'a> TextMessage<'a> {
    /// Plain text message with link previews disabled.
    pub fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: TextBody {
                preview_url: false,
                body,
            },
        }
    }
}

/// Success body returned by the API. Only the message IDs are of interest.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<SentMessageId>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessageId {
    pub id: String,
}

impl SendMessageResponse {
    pub fn first_message_id(self) -> Option<String> {
        self.messages.into_iter().next().map(|m| m.id)
    }
}

/// Graph API error envelope: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Debug, Deserialize)]
pub struct GraphErrorEnvelope {
    pub error: GraphError,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}
