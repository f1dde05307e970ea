use serde::{Deserialize, Serialize};

/// Registration binding a consumer group to one or more event types.
///
/// The `id` is assigned by the server on creation and must be left empty in
/// create payloads; the server's answer carries the canonical representation
/// (defaults filled in, id assigned). Immutable from the client's side once
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub event_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<String>,
}

impl Subscription {
    /// Create a subscription definition for the given event types
    pub fn new(event_types: Vec<impl Into<String>>) -> Self {
        Self {
            id: None,
            event_types: event_types.into_iter().map(|t| t.into()).collect(),
            consumer_group: None,
        }
    }

    pub fn with_consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }
}
