//! Redis-backed dedupe store.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::dedupe::{DedupeStore, StoreError};

/// Dedupe store backed by a shared Redis instance.
///
/// The client is cheap to clone and safe for concurrent use; each claim
/// runs on a multiplexed connection, so concurrent requests block each
/// other no longer than the network round trip.
#[derive(Clone)]
pub struct RedisDedupeStore {
    client: redis::Client,
}

impl RedisDedupeStore {
    /// Create a store from a Redis connection URL.
    pub fn new(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl DedupeStore for RedisDedupeStore {
    async fn claim_once(&self, key: &str, ttl_seconds: u64) -> Result<bool, StoreError> {
        let mut conn = self.get_connection().await?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        // SET NX EX is one atomic command: no check-then-set window
        // between concurrent deliveries of the same event.
        let reply = redis::cmd("SET")
            .arg(key)
            .arg(now)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<Option<String>>(&mut conn)
            .await?;

        let claimed = reply.is_some();
        debug!(key = %key, claimed = claimed, "dedupe_claim");

        Ok(claimed)
    }
}
