// API endpoint handlers

pub mod openai;
