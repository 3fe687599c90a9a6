//! Streamed chat event model and SSE line recovery.
//!
//! The chat endpoint answers with one JSON event per `data: ` line. Events
//! are parsed into [`ChatEvent`] before dispatch; unknown tags land in
//! [`ChatEvent::Ignored`] instead of failing, so a single corrupt or
//! unrecognized line never aborts a streaming session.
//!
//! Chunk boundaries of the underlying byte stream do not align with line
//! boundaries. [`SseLineBuffer`] retains the unterminated trailing fragment
//! between reads and only yields complete lines.

use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::Citation;

/// Marker prefixing every event line on the wire.
pub const DATA_PREFIX: &str = "data: ";

/// One event of a streaming chat session, discriminated by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    /// First event of a session; carries the server-assigned conversation id.
    Start {
        #[serde(default)]
        conversation_id: Option<Uuid>,
    },
    /// One fragment of the assistant answer, in arrival order.
    Chunk { content: String },
    /// One citation attached to the in-progress answer.
    Citation { data: Citation },
    /// Final event; the session's answer is complete.
    Done {
        #[serde(default)]
        full_content: Option<String>,
        #[serde(default)]
        citations: Option<Vec<Citation>>,
    },
    /// Server-signaled error. Does not terminate the stream by itself.
    Error { content: String },
    /// Any event with an unrecognized tag. Logged and skipped.
    #[serde(other)]
    Ignored,
}

/// Stateful line splitter for SSE byte streams.
///
/// Works at the byte level so multi-byte UTF-8 sequences split across reads
/// survive intact.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read's worth of bytes; returns every line completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = &raw[..raw.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            lines.push(String::from_utf8_lossy(line).into_owned());
        }
        lines
    }

    /// Drain the trailing fragment, if any. Called once the stream closes,
    /// in case the final line was not newline-terminated.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&raw).into_owned())
    }
}

/// Parse one decoded line into a [`ChatEvent`].
///
/// Returns `None` for blank lines, `:` comments, and lines without the
/// `data: ` marker. A data line whose JSON payload does not parse is logged
/// and mapped to [`ChatEvent::Ignored`].
pub fn parse_event_line(line: &str) -> Option<ChatEvent> {
    let line = line.trim();

    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let data = match line.strip_prefix(DATA_PREFIX) {
        Some(data) => data,
        None => {
            debug!(line, "Skipping non-data stream line");
            return None;
        }
    };

    match serde_json::from_str::<ChatEvent>(data) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed stream event line");
            Some(ChatEvent::Ignored)
        }
    }
}
