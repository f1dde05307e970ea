// Streaming API client: subscription lifecycle plus the consume loop.

use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::Serialize;

use crate::config::StreamConfig;
use crate::error::{Result, StreamingError};
use crate::monitor::StreamMonitor;
use crate::processor::EventsProcessor;
use crate::streaming::{decode_batch, line_stream};
use crate::types::{Cursor, Subscription};

/// Header carrying the caller's API key on every request.
pub const API_KEY_HEADER: &str = "apikey";

/// Header carrying the server-issued stream id. Set on the events response
/// and echoed on every commit so the server can correlate the commit with
/// the consumer instance that received the batch.
pub const STREAM_ID_HEADER: &str = "X-Eventline-StreamId";

/// Uninterpreted server response, passed through to the caller.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Wire wrapper expected by the cursors endpoint.
#[derive(Serialize)]
struct CursorCommit<'a> {
    items: &'a [Cursor],
}

/// Client for the streaming API.
///
/// Creates and deletes subscriptions, and consumes events from a
/// subscription over a long-lived connection, acknowledging each processed
/// batch by committing its cursor. Consumption keeps reconnecting until the
/// monitor stops the loop; the server rebalances partitions between the
/// streams of one subscription.
pub struct StreamingClient {
    http_client: reqwest::Client,
    config: StreamConfig,
    processor: Arc<dyn EventsProcessor>,
    monitor: Arc<dyn StreamMonitor>,
}

impl StreamingClient {
    pub fn builder() -> StreamingClientBuilder {
        StreamingClientBuilder::default()
    }

    // =========================================================================
    // SUBSCRIPTION LIFECYCLE
    // =========================================================================

    /// Create a subscription.
    ///
    /// Returns the server's canonical representation (id assigned, defaults
    /// filled in). Any status other than 200/201 is surfaced as
    /// [`StreamingError::SubscriptionRejected`] carrying the raw response
    /// body; the request is not retried.
    pub async fn create_subscription(
        &self,
        subscription: &Subscription,
        api_key: &str,
    ) -> Result<Subscription> {
        let response = self
            .http_client
            .post(self.config.subscriptions_url())
            .header(API_KEY_HEADER, api_key)
            .json(subscription)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(StreamingError::SubscriptionRejected { status, body });
        }

        serde_json::from_str(&body).map_err(|e| {
            StreamingError::Decode(format!("invalid subscription response: {}", e))
        })
    }

    /// Delete a subscription.
    ///
    /// The server's answer is handed back raw, whatever the status; only a
    /// transport failure is an error.
    pub async fn delete_subscription(
        &self,
        subscription_id: &str,
        api_key: &str,
    ) -> Result<RawResponse> {
        let response = self
            .http_client
            .delete(self.config.subscription_url(subscription_id))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        Ok(RawResponse {
            status: response.status(),
            body: response.text().await?,
        })
    }

    // =========================================================================
    // CONSUME LOOP
    // =========================================================================

    /// Consume events from a subscription until the monitor stops the loop.
    ///
    /// Each pass opens a fresh stream session. A session ends when the
    /// server closes the connection (routine for idle streams hitting the
    /// stream timeout) or when any step of the decode/process/commit
    /// pipeline fails. After a failure the loop sleeps for the configured
    /// retry interval before reconnecting; a clean close reconnects
    /// immediately. The monitor is consulted between sessions only.
    pub async fn consume_events(&self, subscription_id: &str, api_key: &str) -> Result<()> {
        while self.monitor.should_continue() {
            match self.run_session(subscription_id, api_key).await {
                Ok(()) => {
                    tracing::info!("Stream closed by server, reconnecting");
                }
                Err(e) => {
                    let retry_interval = self.config.retry_interval();
                    tracing::warn!("Error while processing events: {}", e);
                    tracing::warn!(
                        "Sleeping {}ms before reconnecting",
                        retry_interval.as_millis()
                    );
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }

        tracing::info!("Monitor stopped the consume loop");
        Ok(())
    }

    /// One connection attempt: acquire a session, then read, decode,
    /// process and commit strictly in wire order until the stream ends or a
    /// step fails. The connection is torn down on exit either way; nothing
    /// survives into the next session.
    async fn run_session(&self, subscription_id: &str, api_key: &str) -> Result<()> {
        let (stream_id, response) = self.connect(subscription_id, api_key).await?;

        tracing::info!(
            "Connected to event stream for subscription {}; stream id {}",
            subscription_id,
            stream_id
        );

        let mut lines = line_stream(response);

        while let Some(line) = lines.next().await {
            let line = line?;

            let Some(batch) = decode_batch(&line) else {
                continue;
            };

            // Keep-alive: a cursor with no events is neither processed nor
            // committed.
            let Some(events) = batch.events.filter(|events| !events.is_empty()) else {
                continue;
            };

            self.processor
                .process(&events)
                .await
                .map_err(StreamingError::Processing)?;

            self.commit_cursor(&batch.cursor, &stream_id, subscription_id, api_key)
                .await?;
        }

        Ok(())
    }

    /// Acquire a new stream session: open the long-lived events request and
    /// extract the server-issued stream id from the response headers.
    async fn connect(
        &self,
        subscription_id: &str,
        api_key: &str,
    ) -> Result<(String, Response)> {
        let response = self
            .http_client
            .get(self.config.events_url(subscription_id))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StreamingError::Connect { status, body });
        }

        let stream_id = response
            .headers()
            .get(STREAM_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or(StreamingError::MissingStreamId)?;

        Ok((stream_id, response))
    }

    /// Acknowledge a processed batch by committing its cursor.
    ///
    /// The stream id must be the one of the session that produced the
    /// batch; the server rejects commits against stale sessions. Success is
    /// 200 or 204. There is no commit-level retry: a rejected commit
    /// invalidates trust in the session, so recovery is a full reconnect.
    async fn commit_cursor(
        &self,
        cursor: &Cursor,
        stream_id: &str,
        subscription_id: &str,
        api_key: &str,
    ) -> Result<()> {
        let commit = CursorCommit {
            items: std::slice::from_ref(cursor),
        };

        let response = self
            .http_client
            .post(self.config.cursors_url(subscription_id))
            .header(STREAM_ID_HEADER, stream_id)
            .header(API_KEY_HEADER, api_key)
            .json(&commit)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT && status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamingError::CommitRejected { status, body });
        }

        tracing::debug!(
            "Committed cursor partition={} offset={}",
            cursor.partition,
            cursor.offset
        );
        Ok(())
    }
}

/// Builder for StreamingClient
#[derive(Default)]
pub struct StreamingClientBuilder {
    config: Option<StreamConfig>,
    processor: Option<Arc<dyn EventsProcessor>>,
    monitor: Option<Arc<dyn StreamMonitor>>,
}

impl StreamingClientBuilder {
    pub fn config(mut self, config: StreamConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the processor that handles the events of each received batch.
    pub fn processor(mut self, processor: Arc<dyn EventsProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Set the monitor that decides when the consume loop stops.
    pub fn monitor(mut self, monitor: Arc<dyn StreamMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn build(self) -> anyhow::Result<StreamingClient> {
        let config = self.config.context("Stream config is required")?;
        let processor = self.processor.context("Events processor is required")?;
        let monitor = self.monitor.context("Stream monitor is required")?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // No client-wide timeout: the events request is a long-poll that
        // must outlive any fixed deadline.
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(StreamingClient {
            http_client,
            config,
            processor,
            monitor,
        })
    }
}
