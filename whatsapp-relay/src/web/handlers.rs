//! HTTP endpoint handlers.
//!
//! The send handler runs its checks in a fixed order:
//! 1. Method (anything but POST is answered by [`method_not_allowed`])
//! 2. Message body
//! 3. Credentials
//! 4. One outbound call to WhatsApp

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::SendError;
use crate::whatsapp::WhatsAppClient;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: WhatsAppClient,
}

impl AppState {
    pub fn new(config: Config, client: WhatsAppClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Send WhatsApp
// =============================================================================

/// Inbound request body.
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for the send endpoint.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl SendResponse {
    fn sent() -> Self {
        Self {
            success: true,
            message: Some("Message sent successfully."),
            error: None,
        }
    }

    fn failed(error: &'static str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
        }
    }
}

/// Body of the 405 response.
#[derive(Debug, Serialize)]
pub struct MethodNotAllowedResponse {
    pub message: &'static str,
}

/// Fallback for any method other than POST on the send route.
pub async fn method_not_allowed(method: Method) -> Response {
    info!(method = %method, "send_whatsapp_hit");
    warn!(method = %method, "send_whatsapp_method_not_allowed");

    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(MethodNotAllowedResponse {
            message: "Only POST requests are allowed",
        }),
    )
        .into_response()
}

/// Relay a message to WhatsApp.
///
/// The body is read raw and parsed leniently so that an empty or malformed
/// body is a 400 rather than an extractor rejection.
pub async fn send_whatsapp(State(state): State<AppState>, body: Bytes) -> Response {
    info!(body_length = body.len(), "send_whatsapp_hit");

    let message = match extract_message(&body) {
        Some(m) => m,
        None => {
            warn!("send_whatsapp_message_missing");
            return (
                StatusCode::BAD_REQUEST,
                Json(SendResponse::failed("Message content is required.")),
            )
                .into_response();
        }
    };

    info!(message_length = message.len(), "send_whatsapp_message_received");

    for (name, loaded) in state.config.credential_status() {
        info!(
            variable = name,
            status = if loaded { "loaded" } else { "missing" },
            "credential_status"
        );
    }

    let credentials = match state.config.whatsapp_credentials() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "send_whatsapp_config_error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendResponse::failed("Server configuration error.")),
            )
                .into_response();
        }
    };

    match state.client.send_text(&credentials, &message).await {
        Ok(sent) => {
            info!(
                message_id = sent.message_id.as_deref().unwrap_or(""),
                "send_whatsapp_success"
            );
            (StatusCode::OK, Json(SendResponse::sent())).into_response()
        }
        Err(e) => {
            log_send_error(&e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendResponse::failed("Failed to send message.")),
            )
                .into_response()
        }
    }
}

/// Non-empty string `message` from a JSON object body.
fn extract_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<SendRequest>(body)
        .ok()?
        .message
        .filter(|m| !m.is_empty())
}

fn log_send_error(e: &SendError) {
    match e {
        SendError::Upstream { status, message } => {
            error!(
                status_code = *status,
                provider_error = %message,
                "send_whatsapp_rejected"
            );
        }
        SendError::Http(err) if err.is_timeout() => {
            error!(error = %err, "send_whatsapp_timeout");
        }
        SendError::Http(err) => {
            error!(
                error = %err,
                is_connect = err.is_connect(),
                "send_whatsapp_request_error"
            );
        }
        SendError::InvalidEndpoint(_) => {
            error!(error = %e, "send_whatsapp_invalid_endpoint");
        }
    }
}
