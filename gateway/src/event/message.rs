//! Message extraction and incoming/outgoing classification.
//!
//! Only incoming customer messages are eligible for processing. The
//! classifier is deliberately conservative: anything it cannot identify
//! is treated as not incoming, so the gateway never answers agents,
//! bots, or its own replies.

use serde_json::{Map, Value};

/// Candidate locations of the embedded message object, tried in order.
const MESSAGE_PATHS: [&[&str]; 3] = [&["message"], &["data", "message"], &["payload", "message"]];

/// Sender fields that can carry the sender kind, tried in order.
const SENDER_KIND_FIELDS: [&str; 3] = ["type", "sender_type", "role"];

/// Extract the embedded message object from a webhook payload.
///
/// Chatwoot nests the message under different parents depending on the
/// event type and platform version: `message`, `data.message`, or
/// `payload.message`. The first candidate that exists and is itself a
/// JSON object wins; anything else yields `None`.
pub fn extract_message(payload: &Value) -> Option<&Map<String, Value>> {
    MESSAGE_PATHS
        .into_iter()
        .find_map(|path| lookup(payload, path).and_then(Value::as_object))
}

/// Walk a nested key path through a JSON value.
fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |acc, key| acc.get(key))
}

/// How a payload was classified, recording which rule decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Explicit incoming marker on the message type field.
    Incoming,
    /// Explicit outgoing marker on the message type field.
    Outgoing,
    /// No usable type marker, but the sender is an agent or a bot.
    AutomatedSender,
    /// No message object anywhere in the payload.
    NoMessage,
    /// Nothing recognizable; treated as not incoming.
    Unknown,
}

/// Classify a webhook payload.
///
/// The explicit `message_type` marker (falling back to `type` when
/// absent) always wins; the sender heuristic is only consulted when the
/// marker is missing or unrecognized.
pub fn classify(payload: &Value) -> Classification {
    let Some(message) = extract_message(payload) else {
        return Classification::NoMessage;
    };

    let marker = message
        .get("message_type")
        .filter(|v| !v.is_null())
        .or_else(|| message.get("type"));

    if let Some(classification) = marker.and_then(classify_type_marker) {
        return classification;
    }

    if sender_is_automated(message) {
        return Classification::AutomatedSender;
    }

    Classification::Unknown
}

/// Whether a payload is an incoming customer message, the only kind
/// eligible for processing.
pub fn is_incoming(payload: &Value) -> bool {
    classify(payload) == Classification::Incoming
}

/// Interpret an explicit message type marker. Chatwoot uses `0`/`1` in
/// API-shaped payloads and `"incoming"`/`"outgoing"` in webhook-shaped
/// ones.
fn classify_type_marker(marker: &Value) -> Option<Classification> {
    match marker {
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Classification::Incoming),
            Some(1) => Some(Classification::Outgoing),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "incoming" | "inbound" => Some(Classification::Incoming),
            "outgoing" | "outbound" => Some(Classification::Outgoing),
            _ => None,
        },
        _ => None,
    }
}

/// Check whether the message sender looks like an agent or a bot.
fn sender_is_automated(message: &Map<String, Value>) -> bool {
    let Some(sender) = message.get("sender").and_then(Value::as_object) else {
        return false;
    };

    let kind = SENDER_KIND_FIELDS
        .into_iter()
        .find_map(|field| sender.get(field).filter(|v| !v.is_null()));

    match kind.and_then(Value::as_str) {
        Some(kind) => {
            let kind = kind.to_ascii_lowercase();
            kind == "agent" || kind == "bot"
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_message_top_level() {
        let payload = json!({"message": {"id": 1}});
        assert!(extract_message(&payload).is_some());
    }

    #[test]
    fn test_extract_message_under_data() {
        let payload = json!({"data": {"message": {"id": 1}}});
        let message = extract_message(&payload).unwrap();
        assert_eq!(message.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_extract_message_under_payload() {
        let payload = json!({"payload": {"message": {"id": 1}}});
        assert!(extract_message(&payload).is_some());
    }

    #[test]
    fn test_extract_message_prefers_top_level() {
        let payload = json!({
            "message": {"id": "outer"},
            "data": {"message": {"id": "inner"}}
        });
        let message = extract_message(&payload).unwrap();
        assert_eq!(message.get("id"), Some(&json!("outer")));
    }

    #[test]
    fn test_extract_message_rejects_non_objects() {
        assert!(extract_message(&json!({"message": "hello"})).is_none());
        assert!(extract_message(&json!({"message": [1, 2]})).is_none());
        assert!(extract_message(&json!({"message": null})).is_none());
        assert!(extract_message(&json!({})).is_none());
        assert!(extract_message(&json!("not an object")).is_none());
    }

    #[test]
    fn test_classify_incoming_markers() {
        for marker in [json!(0), json!("incoming"), json!("inbound")] {
            let payload = json!({"message": {"message_type": marker}});
            assert_eq!(classify(&payload), Classification::Incoming);
        }
    }

    #[test]
    fn test_classify_outgoing_markers() {
        for marker in [json!(1), json!("outgoing"), json!("outbound")] {
            let payload = json!({"message": {"message_type": marker}});
            assert_eq!(classify(&payload), Classification::Outgoing);
        }
    }

    #[test]
    fn test_classify_falls_back_to_type_field() {
        let payload = json!({"message": {"type": "incoming"}});
        assert_eq!(classify(&payload), Classification::Incoming);
    }

    #[test]
    fn test_classify_message_type_wins_over_type() {
        let payload = json!({"message": {"message_type": 1, "type": "incoming"}});
        assert_eq!(classify(&payload), Classification::Outgoing);
    }

    #[test]
    fn test_classify_marker_wins_over_sender() {
        // An explicit incoming marker is trusted even with a bot sender
        let payload = json!({
            "message": {"message_type": 0, "sender": {"type": "bot"}}
        });
        assert_eq!(classify(&payload), Classification::Incoming);
    }

    #[test]
    fn test_classify_automated_sender() {
        for kind in ["agent", "bot", "Agent", "BOT"] {
            let payload = json!({"message": {"sender": {"type": kind}}});
            assert_eq!(classify(&payload), Classification::AutomatedSender);
        }
    }

    #[test]
    fn test_classify_sender_kind_field_order() {
        let payload = json!({
            "message": {"sender": {"sender_type": "bot", "role": "customer"}}
        });
        assert_eq!(classify(&payload), Classification::AutomatedSender);
    }

    #[test]
    fn test_classify_human_sender_is_unknown() {
        let payload = json!({"message": {"sender": {"type": "contact"}}});
        assert_eq!(classify(&payload), Classification::Unknown);
    }

    #[test]
    fn test_classify_no_message() {
        assert_eq!(classify(&json!({"event": "ping"})), Classification::NoMessage);
    }

    #[test]
    fn test_classify_unrecognized_marker_consults_sender() {
        let payload = json!({
            "message": {"message_type": "broadcast", "sender": {"role": "agent"}}
        });
        assert_eq!(classify(&payload), Classification::AutomatedSender);
    }

    #[test]
    fn test_is_incoming_default_deny() {
        assert!(is_incoming(&json!({"message": {"message_type": 0}})));
        assert!(is_incoming(&json!({"message": {"message_type": "incoming"}})));

        assert!(!is_incoming(&json!({"message": {"message_type": 1}})));
        assert!(!is_incoming(&json!({"message": {"sender": {"type": "bot"}}})));
        assert!(!is_incoming(&json!({"message": {}})));
        assert!(!is_incoming(&json!({})));
    }
}
