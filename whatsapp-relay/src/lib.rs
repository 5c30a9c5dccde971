//! WhatsApp relay - forwards text messages to the WhatsApp Cloud API.
//!
//! The library backs the `relay-web` binary:
//! - `config`: environment configuration and credential lookup
//! - `whatsapp`: single-attempt client for the Cloud API `messages` endpoint
//! - `web`: axum router and handlers
//!
//! ## Flow
//!
//! ```text
//! POST /api/send-whatsapp → validate → WhatsApp Cloud API → JSON response
//! ```

pub mod config;
pub mod error;
pub mod whatsapp;
pub mod web;

// Re-export commonly used types
pub use config::{Config, WhatsAppCredentials};
pub use error::{ConfigError, SendError};
pub use whatsapp::WhatsAppClient;
pub use web::{router, AppState};
