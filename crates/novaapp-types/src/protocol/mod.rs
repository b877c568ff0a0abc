//! Wire protocol types.

pub mod openai;
