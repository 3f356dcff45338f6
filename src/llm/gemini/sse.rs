//! Server-Sent Events (SSE) parser for Gemini responses

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::GenerateContentResponse;

/// Parse a stream of bytes as Gemini SSE events
///
/// Gemini's SSE format uses `data: <json>` lines. Bytes are buffered until a
/// full line is available, so chunk boundaries may fall anywhere, including
/// inside a multi-byte UTF-8 character. Lines other than `data:` are ignored.
pub fn parse_sse_stream<S>(
    byte_stream: S,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let mut buffer: Vec<u8> = Vec::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend_from_slice(&chunk);

        let mut events = Vec::new();
        while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = buffer.drain(..=newline_pos).collect();
            if let Some(event) = parse_line(&raw) {
                events.push(event);
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}

fn parse_line(raw: &[u8]) -> Option<Result<GenerateContentResponse, LlmError>> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => {
            return Some(Err(LlmError::StreamError(format!(
                "Invalid UTF-8 in stream: {}",
                e
            ))))
        }
    };

    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }

    Some(serde_json::from_str(data).map_err(|e| {
        LlmError::MalformedChunk(format!("{}. Data: {}", e, data))
    }))
}
