//! Re-frames the provider's server-sent-event body as newline-delimited JSON.
//!
//! Each `data:` payload becomes exactly one line. The `[DONE]` sentinel ends
//! the stream. Payloads are not parsed here; the client decoder owns that.

use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::future;
use futures::stream::{Stream, StreamExt};

use super::{LlmError, TextStream};

const DONE_SENTINEL: &str = "[DONE]";

pub fn sse_to_ndjson<S, B, E>(body: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let lines = body
        .eventsource()
        .take_while(|item| {
            future::ready(!matches!(item, Ok(event) if event.data.trim() == DONE_SENTINEL))
        })
        .filter_map(|item| async move {
            match item {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => {
                    let mut line = event.data;
                    line.push('\n');
                    Some(Ok(Bytes::from(line)))
                }
                Err(e) => Some(Err(LlmError::Stream(e.to_string()))),
            }
        });

    Box::pin(lines)
}
