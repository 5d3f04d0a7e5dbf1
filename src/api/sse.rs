//! Server-sent events decoding for streamed chat completions.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;
use std::pin::Pin;

use super::ApiError;

const DONE_SENTINEL: &str = "[DONE]";

/// Lazy, finite sequence of text fragments from one completion
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ApiError>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

/// Splits a byte stream into `data:` payloads.
///
/// Network chunks can end anywhere, including inside a UTF-8 sequence, so
/// bytes are buffered until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and collect every event completed by them
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that was not newline terminated
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line).into_iter().collect()
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);

    // Blank lines separate events; ':' starts a comment; other fields are unused here
    let data = line.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);

    if data == DONE_SENTINEL {
        Some(SseEvent::Done)
    } else if data.is_empty() {
        None
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Extract the text carried by one streamed JSON chunk, if any
pub fn parse_chunk(data: &str) -> Result<Option<String>, ApiError> {
    let chunk: StreamChunk =
        serde_json::from_str(data).map_err(|e| ApiError::MalformedChunk(format!("{}: {}", e, data)))?;

    if let Some(error) = chunk.error {
        return Err(ApiError::Provider(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content))
}

struct FragmentState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    input_done: bool,
    finished: bool,
}

/// Turn a response body into a stream of text fragments.
///
/// The stream ends at `[DONE]` or when the body ends, and stops after the
/// first error.
pub fn fragments<S, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let state = FragmentState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        input_done: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(event) = state.pending.pop_front() {
                match event {
                    SseEvent::Done => {
                        tracing::debug!("Received end-of-stream marker");
                        return None;
                    }
                    SseEvent::Data(data) => match parse_chunk(&data) {
                        Ok(Some(text)) => return Some((Ok(text), state)),
                        Ok(None) => continue,
                        Err(e) => {
                            state.finished = true;
                            return Some((Err(e), state));
                        }
                    },
                }
            }

            if state.input_done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(&chunk);
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    tracing::debug!("Response body ended");
                    let events = state.decoder.finish();
                    state.pending.extend(events);
                    state.input_done = true;
                }
            }
        }
    })
    .boxed()
}
