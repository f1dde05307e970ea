use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque position marker within a subscription's event stream.
///
/// The client never interprets the fields; it round-trips whatever the
/// server sent when committing. One cursor accompanies each batch and must
/// be committed in the order its batch arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub partition: String,
    pub offset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// One event as delivered on the wire.
///
/// The body is forwarded verbatim to the processor; the client only routes
/// on metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub metadata: EventMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub body: Value,
}

/// One decoded unit of the stream: a cursor plus its events.
///
/// A batch with no events is a keep-alive and triggers neither processing
/// nor commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    pub cursor: Cursor,
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_with_events() {
        let json = r#"{
            "cursor": {"partition": "0", "offset": "001"},
            "events": [
                {
                    "metadata": {"event_type": "orders.placed", "eid": "e-1"},
                    "template_name": "order_confirmation",
                    "body": {"order_id": 7}
                }
            ]
        }"#;

        let batch: Batch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.cursor.offset, "001");

        let events = batch.events.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.event_type, "orders.placed");
        assert_eq!(events[0].body["order_id"], 7);
    }

    #[test]
    fn test_keep_alive_batch_has_no_events() {
        let json = r#"{"cursor": {"partition": "0", "offset": "001"}}"#;

        let batch: Batch = serde_json::from_str(json).unwrap();
        assert!(batch.events.is_none());
    }

    #[test]
    fn test_cursor_commit_roundtrips_opaque_fields() {
        let json = r#"{
            "partition": "3",
            "offset": "000129",
            "event_type": "orders.placed",
            "cursor_token": "tok-abc"
        }"#;

        let cursor: Cursor = serde_json::from_str(json).unwrap();
        let serialized = serde_json::to_value(&cursor).unwrap();

        assert_eq!(serialized["partition"], "3");
        assert_eq!(serialized["cursor_token"], "tok-abc");
    }
}
