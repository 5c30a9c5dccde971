//! Web server module for relaying messages to WhatsApp.
//!
//! This module provides:
//! - `POST /api/send-whatsapp`: validate, then forward one text message
//! - `GET /health`: liveness probe
//!
//! Any other method on the send route gets a 405 with `Allow: POST`.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    health, method_not_allowed, send_whatsapp, AppState, HealthResponse,
    MethodNotAllowedResponse, SendRequest, SendResponse,
};

pub const SEND_WHATSAPP_PATH: &str = "/api/send-whatsapp";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            SEND_WHATSAPP_PATH,
            post(send_whatsapp).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
