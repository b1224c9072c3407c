// src/sources.rs
//! Per-board search URL construction.
//!
//! Adapters are pure: the same title, location and page index always give
//! the same URL. Only spaces are re-encoded (each board has its own rule);
//! other characters are passed through as typed.

use crate::types::{JobSource, SearchQuery};

const INDEED_PAGE_SIZE: usize = 10;
const LINKEDIN_PAGE_SIZE: usize = 25;

pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> JobSource;

    fn build_url(&self, job_title: &str, location: &str, page_index: usize) -> String;

    fn url_for(&self, query: &SearchQuery) -> String {
        self.build_url(&query.job_title, &query.location, query.page_index)
    }
}

pub struct IndeedAdapter;

impl SourceAdapter for IndeedAdapter {
    fn source(&self) -> JobSource {
        JobSource::Indeed
    }

    fn build_url(&self, job_title: &str, location: &str, page_index: usize) -> String {
        format!(
            "https://www.indeed.com/jobs?q={}&l={}&start={}",
            encode_spaces(job_title, "+"),
            encode_spaces(location, "+"),
            page_index * INDEED_PAGE_SIZE
        )
    }
}

pub struct LinkedInAdapter;

impl SourceAdapter for LinkedInAdapter {
    fn source(&self) -> JobSource {
        JobSource::LinkedIn
    }

    fn build_url(&self, job_title: &str, location: &str, page_index: usize) -> String {
        format!(
            "https://www.linkedin.com/jobs/search/?keywords={}&location={}&start={}",
            encode_spaces(job_title, "%20"),
            encode_spaces(location, "%20"),
            page_index * LINKEDIN_PAGE_SIZE
        )
    }
}

pub struct GlassdoorAdapter;

impl SourceAdapter for GlassdoorAdapter {
    fn source(&self) -> JobSource {
        JobSource::Glassdoor
    }

    /// Glassdoor encodes keyword offsets into the path and pages by number
    fn build_url(&self, job_title: &str, location: &str, page_index: usize) -> String {
        let title = encode_spaces(job_title, "-");
        let place = encode_spaces(location, "-").replace(',', "");
        let place_len = place.chars().count();
        let title_len = title.chars().count();

        format!(
            "https://www.glassdoor.com/Job/{place}-{title}-jobs-SRCH_IL.0,{place_len}_IN{place_len}_KO{},{}_IP{}.htm",
            place_len + 1,
            place_len + 1 + title_len,
            page_index + 1
        )
    }
}

fn encode_spaces(value: &str, replacement: &str) -> String {
    value.trim().replace(' ', replacement)
}

impl JobSource {
    pub fn adapter(&self) -> Box<dyn SourceAdapter> {
        match self {
            JobSource::Indeed => Box::new(IndeedAdapter),
            JobSource::LinkedIn => Box::new(LinkedInAdapter),
            JobSource::Glassdoor => Box::new(GlassdoorAdapter),
        }
    }
}

/// Adapter for a user-supplied source name, `None` when unsupported
pub fn adapter_for(name: &str) -> Option<Box<dyn SourceAdapter>> {
    name.parse::<JobSource>().ok().map(|source| source.adapter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indeed_url() {
        let url = IndeedAdapter.build_url("data scientist", "New York", 1);
        assert!(url.contains("q=data+scientist"));
        assert!(url.contains("l=New+York"));
        assert!(url.contains("start=10"));
        assert_eq!(
            url,
            "https://www.indeed.com/jobs?q=data+scientist&l=New+York&start=10"
        );
    }

    #[test]
    fn test_linkedin_url() {
        let url = LinkedInAdapter.build_url("data scientist", "New York", 2);
        assert_eq!(
            url,
            "https://www.linkedin.com/jobs/search/?keywords=data%20scientist&location=New%20York&start=50"
        );
    }

    #[test]
    fn test_glassdoor_url() {
        let url = GlassdoorAdapter.build_url("data scientist", "New York, NY", 0);
        assert_eq!(
            url,
            "https://www.glassdoor.com/Job/New-York-NY-data-scientist-jobs-SRCH_IL.0,11_IN11_KO12,26_IP1.htm"
        );
    }

    #[test]
    fn test_build_url_is_pure() {
        let adapter = adapter_for("indeed").unwrap();
        let first = adapter.build_url("rust developer", "Remote", 3);
        let _ = adapter.build_url("something else", "Paris", 0);
        assert_eq!(first, adapter.build_url("rust developer", "Remote", 3));
    }

    #[test]
    fn test_url_for_query() {
        let query = SearchQuery::new("data scientist", "New York", "linkedin", 0);
        let adapter = adapter_for(&query.source_name).unwrap();
        assert!(adapter.url_for(&query).ends_with("start=0"));
    }

    #[test]
    fn test_unknown_source_has_no_adapter() {
        assert!(adapter_for("monster").is_none());
        assert_eq!(adapter_for("GlassDoor").unwrap().source(), JobSource::Glassdoor);
    }
}
