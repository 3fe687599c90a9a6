//! Chat event stream built on top of a raw byte stream.
//!
//! The byte stream's chunk boundaries carry no meaning; lines are recovered
//! by a stateful [`SseLineBuffer`] and parsed into [`ChatEvent`]s one line at
//! a time. Malformed lines never surface as stream errors — only transport
//! failures do.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};

use pagechat_core::{parse_event_line, ChatEvent, Error, Result, SseLineBuffer};

/// Stream of parsed chat events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ChatEvent>> + Send>>;

/// Build an event stream from an open chat response.
pub fn event_stream(response: reqwest::Response) -> EventStream {
    parse_event_stream(response.bytes_stream())
}

struct StreamState<S> {
    inner: Pin<Box<S>>,
    buffer: SseLineBuffer,
    queue: VecDeque<Result<ChatEvent>>,
    closed: bool,
}

/// Parse a raw byte stream into chat events.
///
/// Partial lines are buffered across reads; the trailing fragment is flushed
/// when the underlying stream closes, in case the final line was not
/// newline-terminated.
pub fn parse_event_stream(
    bytes: impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static,
) -> EventStream {
    let state = StreamState {
        inner: Box::pin(bytes),
        buffer: SseLineBuffer::new(),
        queue: VecDeque::new(),
        closed: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.queue.pop_front() {
                return Some((item, state));
            }
            if state.closed {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    for line in state.buffer.push(&chunk) {
                        if let Some(event) = parse_event_line(&line) {
                            state.queue.push_back(Ok(event));
                        }
                    }
                }
                Some(Err(e)) => {
                    state
                        .queue
                        .push_back(Err(Error::Request(format!("Stream error: {}", e))));
                }
                None => {
                    state.closed = true;
                    if let Some(line) = state.buffer.flush() {
                        if let Some(event) = parse_event_line(&line) {
                            state.queue.push_back(Ok(event));
                        }
                    }
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_stream(
        chunks: Vec<&'static [u8]>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static {
        stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c))))
    }

    async fn collect(events: EventStream) -> Vec<ChatEvent> {
        events.map(|e| e.unwrap()).collect().await
    }

    #[tokio::test]
    async fn test_events_parsed_in_order() {
        let events = parse_event_stream(byte_stream(vec![
            b"data: {\"type\":\"chunk\",\"content\":\"Hello \"}\n\n",
            b"data: {\"type\":\"chunk\",\"content\":\"world\"}\n\n",
            b"data: {\"type\":\"done\",\"full_content\":\"Hello world\",\"citations\":[]}\n\n",
        ]));

        let events = collect(events).await;
        assert_eq!(events.len(), 3);
        match &events[0] {
            ChatEvent::Chunk { content } => assert_eq!(content, "Hello "),
            other => panic!("Expected chunk, got {:?}", other),
        }
        match &events[2] {
            ChatEvent::Done { full_content, .. } => {
                assert_eq!(full_content.as_deref(), Some("Hello world"))
            }
            other => panic!("Expected done, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_line_split_across_chunks_yields_one_event() {
        let events = parse_event_stream(byte_stream(vec![
            b"data: {\"typ",
            b"e\":\"chunk\",\"content\":\"x\"}\n",
        ]));

        let events = collect(events).await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            ChatEvent::Chunk { content } => assert_eq!(content, "x"),
            other => panic!("Expected chunk, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unterminated_final_line_flushed() {
        let events = parse_event_stream(byte_stream(vec![
            b"data: {\"type\":\"chunk\",\"content\":\"a\"}\ndata: {\"type\":\"done\"}",
        ]));

        let events = collect(events).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], ChatEvent::Done { .. }));
    }

    #[tokio::test]
    async fn test_malformed_line_becomes_ignored_not_error() {
        let events = parse_event_stream(byte_stream(vec![
            b"data: {broken\n",
            b"data: {\"type\":\"chunk\",\"content\":\"ok\"}\n",
        ]));

        let events = collect(events).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChatEvent::Ignored));
        assert!(matches!(events[1], ChatEvent::Chunk { .. }));
    }

    #[tokio::test]
    async fn test_blank_lines_and_comments_dropped() {
        let events = parse_event_stream(byte_stream(vec![
            b"\n: keepalive\n\ndata: {\"type\":\"done\"}\n",
        ]));

        let events = collect(events).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ChatEvent::Done { .. }));
    }
}
