//! Protocol mappers between the vendor wire format and OpenAI.

pub mod openai;
