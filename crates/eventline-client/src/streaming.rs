use std::collections::VecDeque;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use reqwest::Response;

use crate::error::{Result, StreamingError};
use crate::types::Batch;

/// Byte accumulator that frames a streaming response body into lines.
/// Uses VecDeque so drained lines never reallocate the tail.
pub struct LineBuffer {
    buffer: VecDeque<u8>,
}

impl LineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract the next complete line from the buffer, trimmed.
    /// Returns None until a full `\n`-terminated line is available.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;

        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        match std::str::from_utf8(&line_bytes) {
            Ok(line) => Some(Ok(line.trim().to_string())),
            Err(e) => Some(Err(StreamingError::Decode(format!(
                "invalid UTF-8 in stream: {}",
                e
            )))),
        }
    }
}

/// Lazy, non-restartable sequence of raw lines read from a streaming
/// response body.
///
/// The sequence ends when the server closes the connection (routine for
/// idle streams); a read failure surfaces as a transport error. Blank lines
/// are yielded as-is so [`decode_batch`] owns all leniency decisions.
pub fn line_stream(response: Response) -> Pin<Box<dyn Stream<Item = Result<String>> + Send>> {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = LineBuffer::with_capacity(8192);

        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(&bytes);

                    while let Some(line) = buffer.next_line() {
                        yield line;
                    }
                }
                Err(e) => yield Err(StreamingError::Transport(e)),
            }
        }
    })
}

/// Decode one raw line of the stream into a batch.
///
/// Blank and malformed lines are noise on this protocol (keep-alive padding,
/// truncated flushes) and decode to `None` rather than an error, so a single
/// corrupt line cannot terminate a session. Processing and commit failures
/// stay fatal; only decoding is lenient.
pub fn decode_batch(line: &str) -> Option<Batch> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Batch>(line) {
        Ok(batch) => Some(batch),
        Err(e) => {
            tracing::debug!("Skipping undecodable stream line: {}", e);
            None
        }
    }
}
