// User stream decoding — server-sent events into typed stream items.
//
// Mastodon's streaming endpoint speaks plain SSE: `event:` names the payload
// type, `data:` carries its JSON, a blank line ends the event and lines
// starting with `:` are heartbeats. The connection is read by a background
// task that hands decoded items to the adapter over a bounded channel.

use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use super::api::UserStream;
use super::models::{Notification, Status, StreamItem};

/// Capacity of the channel between the connection task and the adapter.
pub const STREAM_BUFFER: usize = 64;

/// A complete server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Upper bound on one event: the unterminated line plus the data collected so far.
pub const MAX_EVENT_BYTES: usize = 1024 * 1024;

/// Incremental SSE decoder. Chunks may split lines (and UTF-8 sequences)
/// anywhere, so raw bytes are buffered until a newline arrives.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    data_len: usize,
    limit: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }

    /// A decoder that rejects events larger than `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            event: None,
            data: Vec::new(),
            data_len: 0,
            limit,
        }
    }

    /// Feed a chunk of the response body, returning every event it completed.
    ///
    /// Fails once the event being assembled outgrows the limit; the decoder
    /// is not usable after that.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.feed_line(line) {
                events.push(event);
            }
        }

        let pending = self.buffer.len() + self.data_len;
        if pending > self.limit {
            anyhow::bail!("Stream event exceeds {} bytes ({pending} pending)", self.limit);
        }
        Ok(events)
    }

    fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            let event = self.event.take();
            self.data_len = 0;
            if self.data.is_empty() {
                return None;
            }
            return Some(SseEvent {
                event: event.unwrap_or_else(|| "message".to_string()),
                data: std::mem::take(&mut self.data).join("\n"),
            });
        }

        // Heartbeat / comment
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data_len += value.len();
                self.data.push(value.to_string());
            }
            _ => {}
        }
        None
    }
}

/// Translate one SSE event into a stream item.
///
/// Only `update` and `notification` carry payloads the adapter reads; every
/// other event name becomes `StreamItem::Other`.
pub fn decode_event(event: &SseEvent) -> Result<StreamItem> {
    match event.event.as_str() {
        "update" => serde_json::from_str::<Status>(&event.data)
            .map(StreamItem::Update)
            .context("Failed to parse streamed status"),
        "notification" => serde_json::from_str::<Notification>(&event.data)
            .map(StreamItem::Notification)
            .context("Failed to parse streamed notification"),
        other => Ok(StreamItem::Other {
            event: other.to_string(),
        }),
    }
}

/// Spawn the task that reads an open streaming response.
///
/// The task ends when the server closes the connection (the channel then
/// closes), after forwarding a connection error, or as soon as the
/// receiver is dropped.
pub fn spawn_user_stream(response: reqwest::Response) -> UserStream {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);

    tokio::spawn(async move {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();

        loop {
            let chunk = tokio::select! {
                _ = tx.closed() => {
                    debug!("User stream receiver dropped, closing connection");
                    return;
                }
                chunk = body.next() => chunk,
            };

            let chunk = match chunk {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    let _ = tx
                        .send(Err(anyhow::Error::new(e).context("User stream connection failed")))
                        .await;
                    return;
                }
                None => {
                    debug!("User stream closed by server");
                    return;
                }
            };

            let events = match decoder.push(&chunk) {
                Ok(events) => events,
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            };

            for event in events {
                if tx.send(decode_event(&event)).await.is_err() {
                    return;
                }
            }
        }
    });

    rx
}
