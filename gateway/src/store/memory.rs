//! In-memory dedupe store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::dedupe::{DedupeStore, StoreError};

/// In-memory dedupe store with TTL expiry, for tests and local
/// development.
///
/// Mirrors the claim contract of
/// [`RedisDedupeStore`](super::RedisDedupeStore); in production the
/// Redis store is what makes deduplication shared across processes.
#[derive(Clone, Default)]
pub struct MemoryDedupeStore {
    claimed: Arc<Mutex<HashMap<String, Instant>>>,
}

impl MemoryDedupeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DedupeStore for MemoryDedupeStore {
    async fn claim_once(&self, key: &str, ttl_seconds: u64) -> Result<bool, StoreError> {
        // The lock is held across check and insert, which makes the
        // claim atomic with respect to concurrent callers.
        let mut claimed = self.claimed.lock().await;

        let now = Instant::now();
        if let Some(expires_at) = claimed.get(key) {
            if *expires_at > now {
                return Ok(false);
            }
        }

        claimed.insert(key.to_string(), now + Duration::from_secs(ttl_seconds));
        Ok(true)
    }
}
