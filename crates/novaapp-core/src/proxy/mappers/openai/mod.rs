// OpenAI mapper module

pub mod request;
pub mod stream_formatters;
pub mod streaming;

pub use request::build_chat_payload;
pub use streaming::{create_openai_sse_stream, ChatStreamState, ChatTranslator, LineOutcome};
