//! The dedupe store contract.

use async_trait::async_trait;
use thiserror::Error;

/// Error surface for dedupe store operations.
///
/// Store unavailability is a systems failure, distinct from the
/// expected rejection outcomes of the webhook pipeline, and is surfaced
/// to the caller rather than masked.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A Redis command or connection attempt failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Atomic set-if-absent claim against a shared expiring key store.
///
/// `claim_once` is the single cross-request coordination point in the
/// gateway: two requests racing on the same key must see exactly one
/// `true` between them.
#[async_trait]
pub trait DedupeStore: Send + Sync {
    /// Claim `key` for `ttl_seconds`.
    ///
    /// Returns `Ok(true)` if the key was absent and has now been set,
    /// expiring after the TTL, or `Ok(false)` if it already existed.
    /// Never modifies an existing key.
    async fn claim_once(&self, key: &str, ttl_seconds: u64) -> Result<bool, StoreError>;
}
