use anyhow::Result;
use async_trait::async_trait;

use crate::types::Event;

/// Capability invoked with the events of each non-empty batch.
///
/// A failure aborts the current stream session before the batch's cursor is
/// committed; the client does not redeliver the batch itself, so
/// implementations that cannot tolerate replays after a reconnect must be
/// idempotent.
#[async_trait]
pub trait EventsProcessor: Send + Sync {
    async fn process(&self, events: &[Event]) -> Result<()>;
}

/// Processor that logs every received event.
pub struct PrintEventsProcessor;

#[async_trait]
impl EventsProcessor for PrintEventsProcessor {
    async fn process(&self, events: &[Event]) -> Result<()> {
        for event in events {
            tracing::info!(
                "Event received: type={} template={} body={}",
                event.metadata.event_type,
                event.template_name.as_deref().unwrap_or("-"),
                serde_json::to_string(&event.body)?
            );
        }
        Ok(())
    }
}

/// Processor that forwards each batch of events into a tokio channel.
///
/// Lets a downstream task own the actual handling while the consume loop
/// stays sequential. A closed receiver fails the send, which aborts the
/// session without committing the batch.
pub struct ChannelProcessor {
    sender: tokio::sync::mpsc::Sender<Vec<Event>>,
}

impl ChannelProcessor {
    pub fn new(sender: tokio::sync::mpsc::Sender<Vec<Event>>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl EventsProcessor for ChannelProcessor {
    async fn process(&self, events: &[Event]) -> Result<()> {
        self.sender
            .send(events.to_vec())
            .await
            .map_err(|_| anyhow::anyhow!("event channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventMetadata;

    fn sample_event(event_type: &str) -> Event {
        Event {
            metadata: EventMetadata {
                event_type: event_type.to_string(),
                eid: None,
                occurred_at: None,
            },
            template_name: None,
            body: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_channel_processor_forwards_batches() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        let processor = ChannelProcessor::new(tx);

        let events = vec![sample_event("a"), sample_event("b")];
        processor.process(&events).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].metadata.event_type, "a");
    }

    #[tokio::test]
    async fn test_channel_processor_fails_when_receiver_dropped() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        drop(rx);
        let processor = ChannelProcessor::new(tx);

        let result = processor.process(&[sample_event("a")]).await;
        assert!(result.is_err());
    }
}
