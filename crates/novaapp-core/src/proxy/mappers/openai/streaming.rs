// Vendor SSE -> OpenAI chunk translation

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde_json::Value;

use novaapp_types::protocol::openai::ChatCompletionChunk;

use super::stream_formatters::{done_frame, sse_frame};
use crate::proxy::common::sse_parser::{data_payload, DONE_SENTINEL};

/// Lifecycle of one chat stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStreamState {
    Started,
    Streaming,
    ClosedOk,
    ClosedError,
}

/// What a single upstream line turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Not a data line, or noise the upstream is known to emit.
    Skip,
    /// A content delta to forward immediately.
    Emit(Bytes),
    /// `data: [DONE]` seen.
    Done,
}

/// Per-request translation state. Emits frames in receipt order without buffering.
#[derive(Debug)]
pub struct ChatTranslator {
    stream_id: String,
    created: i64,
    model: String,
    state: ChatStreamState,
}

impl ChatTranslator {
    /// `model` is the name the caller requested, echoed in every chunk.
    pub fn new(stream_id: String, created: i64, model: String) -> Self {
        Self { stream_id, created, model, state: ChatStreamState::Started }
    }

    pub fn state(&self) -> ChatStreamState {
        self.state
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Upstream accepted the request; start reading lines.
    pub fn begin_streaming(&mut self) {
        if self.state == ChatStreamState::Started {
            self.state = ChatStreamState::Streaming;
        }
    }

    /// Translate one upstream line.
    pub fn on_line(&mut self, line: &str) -> LineOutcome {
        let Some(payload) = data_payload(line) else {
            return LineOutcome::Skip;
        };
        if payload == DONE_SENTINEL {
            return LineOutcome::Done;
        }

        let delta = serde_json::from_str::<Value>(payload).ok().and_then(|json| {
            json.get("choices")
                .and_then(|c| c.get(0))
                .and_then(|choice| choice.get("delta"))
                .and_then(|delta| delta.get("content"))
                .and_then(|content| content.as_str())
                .map(str::to_string)
        });

        match delta {
            Some(text) => LineOutcome::Emit(self.chunk(Some(text), None)),
            None => {
                if !payload.is_empty() {
                    tracing::warn!("[Chat] Skipping unparseable SSE frame: {:.200}", payload);
                }
                LineOutcome::Skip
            },
        }
    }

    /// Two-frame trailer for a clean finish: empty stop chunk, then `[DONE]`.
    pub fn finish(&mut self) -> [Bytes; 2] {
        self.state = ChatStreamState::ClosedOk;
        [self.chunk(Some(String::new()), Some("stop")), done_frame()]
    }

    /// Error message as a final assistant chunk, then `[DONE]`.
    pub fn fail(&mut self, message: &str) -> [Bytes; 2] {
        self.state = ChatStreamState::ClosedError;
        [self.chunk(Some(message.to_string()), Some("stop")), done_frame()]
    }

    fn chunk(&self, content: Option<String>, finish_reason: Option<&str>) -> Bytes {
        sse_frame(&ChatCompletionChunk::new(
            &self.stream_id,
            self.created,
            &self.model,
            content,
            finish_reason,
        ))
    }
}

/// Human-readable text for an in-band error chunk.
pub fn error_message(err: &impl std::fmt::Display) -> String {
    format!("Upstream error: {}", err)
}

/// Re-stream an upstream SSE body as OpenAI frames.
///
/// The translator must already be in `Streaming`. Lines are cut on `\n`;
/// a trailing unterminated line is processed when the body ends. A body read
/// error closes the stream with an in-band error chunk.
pub fn create_openai_sse_stream<S, E>(
    upstream: S,
    mut translator: ChatTranslator,
) -> impl Stream<Item = Bytes> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut buffer = BytesMut::new();
        let mut done = false;

        'read: while let Some(item) = upstream.next().await {
            match item {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line_raw = buffer.split_to(pos + 1);
                        let line = String::from_utf8_lossy(&line_raw);
                        match translator.on_line(line.trim()) {
                            LineOutcome::Skip => {},
                            LineOutcome::Emit(frame) => yield frame,
                            LineOutcome::Done => {
                                done = true;
                                break 'read;
                            },
                        }
                    }
                },
                Err(e) => {
                    tracing::error!("[Chat] Upstream body read failed: {}", e);
                    for frame in translator.fail(&error_message(&e)) {
                        yield frame;
                    }
                    return;
                },
            }
        }

        if !done && !buffer.is_empty() {
            let line = String::from_utf8_lossy(&buffer).into_owned();
            if let LineOutcome::Emit(frame) = translator.on_line(line.trim()) {
                yield frame;
            }
        }

        tracing::debug!("[Chat] Stream {} finished, yielding [DONE]", translator.stream_id());
        for frame in translator.finish() {
            yield frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn translator() -> ChatTranslator {
        let mut t = ChatTranslator::new("chatcmpl-test".to_string(), 1_700_000_000, "gpt-4o".to_string());
        t.begin_streaming();
        t
    }

    fn frame_json(frame: &Bytes) -> Value {
        let text = std::str::from_utf8(frame).expect("utf8 frame");
        let body = text.strip_prefix("data: ").and_then(|s| s.strip_suffix("\n\n")).expect("sse frame");
        serde_json::from_str(body).expect("json frame")
    }

    async fn collect(parts: Vec<Result<&'static str, String>>, t: ChatTranslator) -> Vec<Bytes> {
        let upstream = stream::iter(parts.into_iter().map(|p| p.map(Bytes::from)));
        create_openai_sse_stream(upstream, t).collect().await
    }

    #[test]
    fn test_state_transitions() {
        let mut t = ChatTranslator::new("id".to_string(), 0, "m".to_string());
        assert_eq!(t.state(), ChatStreamState::Started);
        t.begin_streaming();
        assert_eq!(t.state(), ChatStreamState::Streaming);
        let _ = t.finish();
        assert_eq!(t.state(), ChatStreamState::ClosedOk);

        let mut t = ChatTranslator::new("id".to_string(), 0, "m".to_string());
        let _ = t.fail("boom");
        assert_eq!(t.state(), ChatStreamState::ClosedError);
    }

    #[test]
    fn test_content_line_emits_chunk_with_requested_model() {
        let mut t = translator();
        let LineOutcome::Emit(frame) = t.on_line(r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#) else {
            panic!("expected emit");
        };
        let v = frame_json(&frame);
        assert_eq!(v["id"], "chatcmpl-test");
        assert_eq!(v["model"], "gpt-4o");
        assert_eq!(v["created"], 1_700_000_000);
        assert_eq!(v["choices"][0]["delta"]["content"], "Hi");
        assert!(v["choices"][0]["finish_reason"].is_null());
    }

    #[test]
    fn test_noise_lines_are_skipped() {
        let mut t = translator();
        assert_eq!(t.on_line("data: not-json"), LineOutcome::Skip);
        assert_eq!(t.on_line(r#"data: {"choices":[]}"#), LineOutcome::Skip);
        assert_eq!(t.on_line(r#"data: {"choices":[{"delta":{}}]}"#), LineOutcome::Skip);
        assert_eq!(t.on_line("event: message"), LineOutcome::Skip);
        assert_eq!(t.on_line(""), LineOutcome::Skip);
        assert_eq!(t.on_line("data: [DONE]"), LineOutcome::Done);
    }

    #[tokio::test]
    async fn test_hi_then_done_yields_exactly_three_frames() {
        let frames = collect(
            vec![Ok("data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n")],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(frame_json(&frames[0])["choices"][0]["delta"]["content"], "Hi");
        let stop = frame_json(&frames[1]);
        assert_eq!(stop["choices"][0]["delta"]["content"], "");
        assert_eq!(stop["choices"][0]["finish_reason"], "stop");
        assert_eq!(&frames[2][..], b"data: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_end_stream() {
        let frames = collect(
            vec![
                Ok("data: not-json\n"),
                Ok("data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n"),
            ],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(frame_json(&frames[0])["choices"][0]["delta"]["content"], "ok");
        assert_eq!(frame_json(&frames[1])["choices"][0]["finish_reason"], "stop");
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks_are_reassembled() {
        let frames = collect(
            vec![
                Ok("data: {\"choices\":[{\"del"),
                Ok("ta\":{\"content\":\"split\"}}]}\n"),
                Ok("data: [DONE]\n"),
            ],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(frame_json(&frames[0])["choices"][0]["delta"]["content"], "split");
    }

    #[tokio::test]
    async fn test_frames_after_done_are_ignored() {
        let frames = collect(
            vec![Ok(
                "data: [DONE]\ndata: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n",
            )],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 2);
        assert_eq!(frame_json(&frames[0])["choices"][0]["finish_reason"], "stop");
    }

    #[tokio::test]
    async fn test_unterminated_final_line_is_processed() {
        let frames = collect(
            vec![Ok("data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}")],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(frame_json(&frames[0])["choices"][0]["delta"]["content"], "tail");
    }

    #[tokio::test]
    async fn test_body_error_becomes_in_band_error_chunk() {
        let frames = collect(
            vec![
                Ok("data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n"),
                Err("connection reset".to_string()),
            ],
            translator(),
        )
        .await;

        assert_eq!(frames.len(), 3);
        let err = frame_json(&frames[1]);
        assert_eq!(err["choices"][0]["finish_reason"], "stop");
        let content = err["choices"][0]["delta"]["content"].as_str().expect("string content");
        assert!(content.contains("connection reset"));
        assert_eq!(&frames[2][..], b"data: [DONE]\n\n");
    }
}
