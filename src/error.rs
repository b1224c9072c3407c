// src/error.rs
use thiserror::Error;

/// Number of characters of an offending provider response kept for diagnostics.
pub const SNIPPET_CHARS: usize = 100;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Render failed: {0}")]
    Render(String),

    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ScrapeError {
    /// Short label used in tallies and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Render(_) => "render",
            ScrapeError::Provider(_) => "provider",
            ScrapeError::Parse(_) => "parse",
            ScrapeError::UnsupportedSource(_) => "unsupported_source",
            ScrapeError::Configuration(_) => "configuration",
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Provider(err.to_string())
    }
}

/// Provider output that could not be turned into job records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse provider response as JSON ({reason}): {snippet}...")]
pub struct ParseFailure {
    pub snippet: String,
    pub reason: String,
}

impl ParseFailure {
    pub fn new(raw_text: &str, reason: impl Into<String>) -> Self {
        Self {
            snippet: crate::utils::snippet(raw_text, SNIPPET_CHARS),
            reason: reason.into(),
        }
    }
}
