//! Chatwoot Gateway - webhook ingestion for customer-support events.
//!
//! This library provides the shared modules behind the `gateway-web`
//! binary, which receives Chatwoot webhooks and decides whether each
//! event deserves downstream processing:
//!
//! ## Pipeline
//!
//! ```text
//! Webhook → Signature check → JSON parse → Incoming filter → Identity → Dedupe claim
//! ```
//!
//! Only never-seen-before incoming customer messages make it through;
//! everything else is acknowledged and dropped so the sender never
//! retries expected rejections.

pub mod config;
pub mod event;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use event::{classify, extract_message, is_incoming, resolve_identity, Classification};
pub use store::{DedupeStore, MemoryDedupeStore, RedisDedupeStore, StoreError};
pub use web::AppState;
