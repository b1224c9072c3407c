pub mod aggregator;
pub mod browser;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod extraction;
pub mod orchestrator;
pub mod pacing;
pub mod persistence;
pub mod sources;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use aggregator::{FilterCriteria, JobAggregator};
pub use config::ScraperConfig;
pub use error::{ParseFailure, ScrapeError};
pub use orchestrator::{ScrapeOrchestrator, ScrapeReport};
pub use persistence::JobWriter;
pub use types::{JobRecord, JobSource};
