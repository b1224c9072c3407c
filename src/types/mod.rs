// src/types/mod.rs
pub mod job;
pub mod page;

pub use job::{JobRecord, JobSource, NOT_SPECIFIED};
pub use page::{ExtractionRequest, PageContent, RequestKind, SearchQuery};
