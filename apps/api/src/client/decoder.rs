//! Chunk decoding for the generation response body.
//!
//! The body is newline-delimited JSON. Each line that carries
//! `choices[0].delta.content` as a string becomes one [`ChunkEvent`]; every
//! other line (blank, garbage, control lines without a delta) is skipped.
//! Skipping is the contract, not an error path.

use std::collections::VecDeque;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;

use crate::client::transport::TransportError;

/// One decoded protocol line. `delta_text` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEvent {
    pub delta_text: String,
}

/// Splits reads into lines and parses each complete line.
///
/// An unfinished trailing line is held until the next read so a line split
/// across reads still decodes. Bytes are buffered, not text, so multi-byte
/// characters split across reads survive too.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one read; returns the events from every line it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<ChunkEvent> {
        self.pending.extend_from_slice(bytes);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split(|&b| b == b'\n')
            .filter_map(|line| parse_line(&String::from_utf8_lossy(line)))
            .collect()
    }

    /// Flushes whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<ChunkEvent> {
        let rest = std::mem::take(&mut self.pending);
        parse_line(&String::from_utf8_lossy(&rest))
    }
}

/// Parses one protocol line. `None` for anything without a string delta.
pub fn parse_line(line: &str) -> Option<ChunkEvent> {
    if line.trim().is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(line).ok()?;
    let content = value.pointer("/choices/0/delta/content")?.as_str()?;
    Some(ChunkEvent {
        delta_text: content.to_string(),
    })
}

struct DecodeState<S> {
    body: S,
    decoder: ChunkDecoder,
    ready: VecDeque<ChunkEvent>,
    done: bool,
}

/// Turns a response body into a lazy, in-order sequence of chunk events.
///
/// Iteration ends exactly when the body ends. A transport error is yielded
/// once and then iteration stops; reads are never retried.
pub fn decode_chunks<S>(
    body: S,
) -> impl Stream<Item = Result<ChunkEvent, TransportError>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, TransportError>> + Send + Unpin + 'static,
{
    let state = DecodeState {
        body,
        decoder: ChunkDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                return Some((Ok(event), state));
            }
            if state.done {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.push(&bytes);
                    state.ready.extend(events);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.done = true;
                    state.ready.extend(state.decoder.finish());
                }
            }
        }
    })
}
