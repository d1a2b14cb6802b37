//! Chatwoot event interpretation.
//!
//! Webhook payload shapes vary across Chatwoot versions and event
//! types, so everything here treats the payload as untrusted,
//! partially-present JSON rather than deserializing into fixed structs.

pub mod identity;
pub mod message;

pub use identity::{canonical_json, resolve_identity};
pub use message::{classify, extract_message, is_incoming, Classification};
