// OpenAI SSE stream formatting helpers

use bytes::Bytes;
use serde::Serialize;

use crate::proxy::common::sse_parser::DONE_SENTINEL;

/// Format an SSE data frame.
#[inline]
pub fn sse_frame<T: Serialize>(data: &T) -> Bytes {
    Bytes::from(format!("data: {}\n\n", serde_json::to_string(data).unwrap_or_default()))
}

/// The literal `data: [DONE]` terminator frame.
#[inline]
pub fn done_frame() -> Bytes {
    Bytes::from(format!("data: {}\n\n", DONE_SENTINEL))
}

/// Fresh stream id in OpenAI's `chatcmpl-` form.
pub fn new_stream_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4())
}
