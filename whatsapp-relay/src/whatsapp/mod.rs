//! WhatsApp Cloud API integration.
//!
//! This module provides:
//! - Wire types for the `messages` endpoint
//! - A single-attempt async client for sending text messages

pub mod client;
pub mod types;

pub use client::{SentMessage, WhatsAppClient};
pub use types::{GraphErrorEnvelope, SendMessageResponse, TextMessage};
