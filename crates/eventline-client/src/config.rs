// Configuration layer for the streaming client
// Replaces process-wide endpoint/timeout constants with an immutable value
// constructed once and passed in, so independently-configured subscriptions
// can run side by side.

use std::time::Duration;

/// Immutable connection and tuning settings for one streaming client.
///
/// The commit timeout is forwarded to the server on the events request; the
/// retry interval derived from it stays above the server's own timeout so a
/// slow server is not hammered with immediate reconnects.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    base_url: String,
    batch_flush_timeout: Duration,
    batch_limit: u32,
    commit_timeout: Duration,
    retry_margin: Duration,
}

impl StreamConfig {
    /// Create a config for the given API base URL with default tuning.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            batch_flush_timeout: Duration::from_secs(5),
            batch_limit: 1,
            commit_timeout: Duration::from_secs(60),
            retry_margin: Duration::from_secs(5),
        }
    }

    /// How long the server may buffer events before flushing a batch.
    pub fn with_batch_flush_timeout(mut self, timeout: Duration) -> Self {
        self.batch_flush_timeout = timeout;
        self
    }

    /// Maximum number of events per batch.
    pub fn with_batch_limit(mut self, limit: u32) -> Self {
        self.batch_limit = limit;
        self
    }

    /// How long the server waits for a commit before dropping the session.
    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = timeout;
        self
    }

    /// Extra delay on top of the commit timeout before reconnecting.
    pub fn with_retry_margin(mut self, margin: Duration) -> Self {
        self.retry_margin = margin;
        self
    }

    pub fn commit_timeout(&self) -> Duration {
        self.commit_timeout
    }

    /// Delay before the next connection attempt after a failed session.
    /// Always at least the server's commit timeout plus the margin.
    pub fn retry_interval(&self) -> Duration {
        self.commit_timeout + self.retry_margin
    }

    pub fn subscriptions_url(&self) -> String {
        format!("{}/api/v1/subscriptions", self.base_url)
    }

    pub fn subscription_url(&self, subscription_id: &str) -> String {
        format!("{}/{}", self.subscriptions_url(), subscription_id)
    }

    pub fn events_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/{}/events?batch_flush_timeout={}&batch_limit={}&commit_timeout={}",
            self.subscriptions_url(),
            subscription_id,
            self.batch_flush_timeout.as_secs(),
            self.batch_limit,
            self.commit_timeout.as_secs(),
        )
    }

    pub fn cursors_url(&self, subscription_id: &str) -> String {
        format!("{}/{}/cursors", self.subscriptions_url(), subscription_id)
    }
}
