//! Stable event identity derivation.
//!
//! Chatwoot redelivers webhooks, sometimes with a different envelope
//! around the same logical event, so the dedupe key must come from the
//! event content rather than the delivery. Identity sources are tried
//! most-specific first:
//!
//! 1. `msg:<id>` from the message's own id
//! 2. `conv:<conversation>:<content hash>` for installations that omit message ids
//! 3. `evt:<id>` from a generic top-level event field
//! 4. `payload:<hash>` over the canonicalized payload, the total fallback

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::message::extract_message;

/// Message fields that can carry the message id, tried in order.
const MESSAGE_ID_FIELDS: [&str; 2] = ["id", "message_id"];

/// Top-level fields that can carry a generic event id, tried in order.
const EVENT_ID_FIELDS: [&str; 4] = ["event_id", "event", "event_name", "id"];

/// The ordered identity extractors. The first that produces an identity
/// wins; the payload hash in [`resolve_identity`] catches everything
/// else.
const IDENTITY_EXTRACTORS: [fn(&Value) -> Option<String>; 3] =
    [message_id_identity, conversation_identity, event_field_identity];

/// Derive a stable identity for a webhook event.
///
/// Deterministic and total: the same payload always yields the same
/// identity, and every payload yields one.
pub fn resolve_identity(payload: &Value) -> String {
    IDENTITY_EXTRACTORS
        .into_iter()
        .find_map(|extract| extract(payload))
        .unwrap_or_else(|| payload_hash_identity(payload))
}

/// `msg:<id>` from the message's `id` or `message_id` field.
fn message_id_identity(payload: &Value) -> Option<String> {
    let message = extract_message(payload)?;
    MESSAGE_ID_FIELDS
        .into_iter()
        .find_map(|field| present(message, field))
        .map(|id| format!("msg:{}", scalar_string(id)))
}

/// `conv:<conversation_id>:<sha256(content)>` for messages without ids.
fn conversation_identity(payload: &Value) -> Option<String> {
    let message = extract_message(payload)?;
    let conversation = present(message, "conversation_id")?;
    let content = message.get("content").and_then(Value::as_str).unwrap_or("");

    Some(format!(
        "conv:{}:{}",
        scalar_string(conversation),
        sha256_hex(content.as_bytes())
    ))
}

/// `evt:<id>` from the first usable top-level event field.
fn event_field_identity(payload: &Value) -> Option<String> {
    EVENT_ID_FIELDS
        .into_iter()
        .find_map(|field| payload.get(field).filter(|v| !v.is_null()))
        .map(|id| format!("evt:{}", scalar_string(id)))
}

/// `payload:<hash>` over the canonicalized payload. Never fails, which
/// makes the whole cascade total.
fn payload_hash_identity(payload: &Value) -> String {
    format!("payload:{}", sha256_hex(canonical_json(payload).as_bytes()))
}

/// A non-null message field.
fn present<'a>(message: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    message.get(field).filter(|v| !v.is_null())
}

/// Render a scalar for embedding in an identity: strings verbatim,
/// everything else in its JSON form.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialize a JSON value with object keys sorted, so equivalent
/// payloads hash identically regardless of key order on the wire.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
