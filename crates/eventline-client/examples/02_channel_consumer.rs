use std::sync::Arc;

use anyhow::Result;
use eventline_client::{ChannelProcessor, SessionBudget, StreamConfig, StreamingClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let subscription_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: 02_channel_consumer <subscription-id>"))?;
    let api_key = std::env::var("EVENTLINE_API_KEY")?;

    let (tx, mut rx) = tokio::sync::mpsc::channel::<Vec<eventline_client::Event>>(16);

    // Handle batches in a separate task while the consume loop stays
    // sequential. Dropping the receiver aborts the loop's next delivery.
    let handler = tokio::spawn(async move {
        while let Some(events) = rx.recv().await {
            for event in &events {
                println!(
                    "{}: {}",
                    event.metadata.event_type,
                    serde_json::to_string(&event.body).unwrap_or_default()
                );
            }
        }
    });

    let client = StreamingClient::builder()
        .config(StreamConfig::new("http://localhost:8080"))
        .processor(Arc::new(ChannelProcessor::new(tx)))
        .monitor(Arc::new(SessionBudget::new(3)))
        .build()?;

    client.consume_events(&subscription_id, &api_key).await?;

    drop(client);
    handler.await?;

    Ok(())
}
