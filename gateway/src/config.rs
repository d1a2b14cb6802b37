//! Configuration module for environment variable parsing.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for webhook HMAC verification; unset disables it
    pub webhook_secret: Option<String>,

    /// Redis connection URL for the dedupe store
    pub redis_url: String,

    /// Time-to-live in seconds for dedupe markers
    pub dedupe_ttl_seconds: u64,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            webhook_secret: env::var("CHATWOOT_WEBHOOK_SECRET").ok(),

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string()),

            dedupe_ttl_seconds: env::var("DEDUPE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400), // 24 hours default

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }
}
