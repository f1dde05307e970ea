use std::sync::Arc;

use anyhow::Result;
use eventline_client::{
    PrintEventsProcessor, ShutdownFlag, StreamConfig, StreamingClient, Subscription,
};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("EVENTLINE_API_KEY")?;

    let client = StreamingClient::builder()
        .config(StreamConfig::new("http://localhost:8080"))
        .processor(Arc::new(PrintEventsProcessor))
        .monitor(Arc::new(ShutdownFlag::new()))
        .build()?;

    let definition =
        Subscription::new(vec!["payments.transaction.created"]).with_consumer_group("demo");

    let created = client.create_subscription(&definition, &api_key).await?;
    let id = created.id.unwrap_or_default();
    println!("Created subscription: {}", id);

    let response = client.delete_subscription(&id, &api_key).await?;
    println!("Delete answered {}: {}", response.status, response.body);

    Ok(())
}
