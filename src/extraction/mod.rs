// src/extraction/mod.rs
pub mod parser;
pub mod prompt;

pub use parser::ResponseParser;
pub use prompt::{ExtractionPromptBuilder, DEFAULT_MAX_CONTENT_CHARS};
