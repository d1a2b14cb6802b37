//! Chatwoot webhook signature verification.
//!
//! Chatwoot installations can be configured to sign webhook requests
//! with HMAC-SHA256 over the raw request body, delivered in the
//! `X-Chatwoot-Signature` header either as the bare hex digest or
//! prefixed with `sha256=`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Verify a Chatwoot webhook signature.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret, if one is configured
/// * `raw_body` - The raw request body bytes, exactly as received
/// * `signature_header` - The signature header value, if present
///
/// # Returns
///
/// `true` if the signature matches, or if verification is disabled
/// because no secret (or a blank one) is configured. `false` otherwise.
pub fn verify_webhook_signature(
    secret: Option<&str>,
    raw_body: &[u8],
    signature_header: Option<&str>,
) -> bool {
    // No secret configured means verification is disabled
    let Some(secret) = secret.filter(|s| !s.trim().is_empty()) else {
        return true;
    };

    let Some(header) = signature_header else {
        warn!("chatwoot_signature_missing");
        return false;
    };

    // Some installations send "sha256=<hash>", others just the hash.
    let cleaned = header.trim();
    let cleaned = cleaned.strip_prefix("sha256=").unwrap_or(cleaned).trim();

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("chatwoot_signature_invalid_key");
            return false;
        }
    };

    mac.update(raw_body);

    let expected = hex::encode(mac.finalize().into_bytes());

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected, cleaned);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = cleaned.len(),
            "chatwoot_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if webhook signature verification is enabled.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
