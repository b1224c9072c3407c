// src/types/page.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a single render attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub url: String,
    pub raw_text: String,
    pub captured_at: DateTime<Utc>,
    pub success: bool,
    pub failure: Option<String>,
}

impl PageContent {
    pub fn captured(url: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_text: raw_text.into(),
            captured_at: Utc::now(),
            success: true,
            failure: None,
        }
    }

    /// Failed render: no text, reason kept for the report
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_text: String::new(),
            captured_at: Utc::now(),
            success: false,
            failure: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Pull job listings out of page content
    Extraction,
    /// The page could not be rendered; ask for troubleshooting guidance instead
    Troubleshooting,
}

/// Instruction and content pair sent to the completion provider for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub kind: RequestKind,
    pub system: Option<String>,
    pub user: String,
}

impl ExtractionRequest {
    pub fn is_degraded(&self) -> bool {
        self.kind == RequestKind::Troubleshooting
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub job_title: String,
    pub location: String,
    pub source_name: String,
    pub page_index: usize,
}

impl SearchQuery {
    pub fn new(job_title: &str, location: &str, source_name: &str, page_index: usize) -> Self {
        Self {
            job_title: job_title.to_string(),
            location: location.to_string(),
            source_name: source_name.to_string(),
            page_index,
        }
    }
}
