use std::sync::Arc;

use anyhow::Result;
use eventline_client::{PrintEventsProcessor, ShutdownFlag, StreamConfig, StreamingClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let subscription_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: 01_consume <subscription-id>"))?;
    let api_key = std::env::var("EVENTLINE_API_KEY")?;

    let monitor = ShutdownFlag::new();
    let shutdown = monitor.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.stop();
        }
    });

    let client = StreamingClient::builder()
        .config(StreamConfig::new("http://localhost:8080"))
        .processor(Arc::new(PrintEventsProcessor))
        .monitor(Arc::new(monitor))
        .build()?;

    client.consume_events(&subscription_id, &api_key).await?;

    Ok(())
}
