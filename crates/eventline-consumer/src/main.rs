use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventline_client::{PrintEventsProcessor, ShutdownFlag, StreamingClient, Subscription};
use eventline_consumer::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Eventline consumer");
    tracing::info!("Streaming API endpoint: {}", config.api.base_url);

    // Shutdown flag flipped by ctrl-c; the loop finishes its current
    // session before stopping.
    let monitor = ShutdownFlag::new();
    let shutdown = monitor.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested, stopping after the current session");
            shutdown.stop();
        }
    });

    let client = StreamingClient::builder()
        .config(config.stream_config())
        .processor(Arc::new(PrintEventsProcessor))
        .monitor(Arc::new(monitor))
        .build()?;

    let subscription_id = resolve_subscription(&client, &config).await?;

    tracing::info!("Consuming events from subscription {}", subscription_id);
    client
        .consume_events(&subscription_id, &config.api_key)
        .await?;

    tracing::info!("Consumer stopped");
    Ok(())
}

/// Use the configured subscription id, or create a subscription from the
/// configured event types when none is set.
async fn resolve_subscription(client: &StreamingClient, config: &Config) -> anyhow::Result<String> {
    if let Some(id) = &config.subscription.id {
        return Ok(id.clone());
    }

    if config.subscription.event_types.is_empty() {
        anyhow::bail!("Either a subscription id or a list of event types must be configured");
    }

    let mut definition = Subscription::new(config.subscription.event_types.clone());
    if let Some(group) = &config.subscription.consumer_group {
        definition = definition.with_consumer_group(group);
    }

    let created = client
        .create_subscription(&definition, &config.api_key)
        .await?;
    let id = created
        .id
        .context("Server returned a subscription without an id")?;

    tracing::info!("Created subscription {}", id);
    Ok(id)
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
