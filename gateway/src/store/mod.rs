//! Dedupe store for at-most-once webhook processing.
//!
//! The store holds one marker per event identity with a TTL. Claiming a
//! marker must be a single atomic set-if-absent so that concurrent
//! deliveries of the same event race safely: exactly one claims it.

pub mod dedupe;
pub mod memory;
pub mod redis;

pub use dedupe::{DedupeStore, StoreError};
pub use memory::MemoryDedupeStore;
pub use self::redis::RedisDedupeStore;
