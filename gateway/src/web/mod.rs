//! Web server module for handling inbound Chatwoot webhooks.
//!
//! This module provides the HTTP surface of the gateway:
//! - Receives Chatwoot webhooks
//! - Verifies HMAC signatures over the raw body
//! - Filters and deduplicates events
//! - Acknowledges everything with a stable JSON contract

pub mod handlers;
pub mod signature;

pub use handlers::{
    chatwoot_webhook, health, root, router, AppState, StatusResponse, WebhookResponse,
};
pub use signature::{is_signature_verification_enabled, verify_webhook_signature};
