pub mod client;
pub mod config;
pub mod error;
pub mod monitor;
pub mod processor;
pub mod streaming;
pub mod types;

pub use client::{
    RawResponse, StreamingClient, StreamingClientBuilder, API_KEY_HEADER, STREAM_ID_HEADER,
};
pub use config::StreamConfig;
pub use error::{Result, StreamingError};
pub use monitor::{SessionBudget, ShutdownFlag, ShutdownHandle, StreamMonitor};
pub use processor::{ChannelProcessor, EventsProcessor, PrintEventsProcessor};
pub use streaming::{decode_batch, line_stream, LineBuffer};
pub use types::{Batch, Cursor, Event, EventMetadata, Subscription};
