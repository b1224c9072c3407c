// src/extraction/prompt.rs
use crate::types::{ExtractionRequest, PageContent, RequestKind};
use crate::utils::{truncate_chars, visible_text};
use tracing::debug;

/// Upper bound on page characters embedded in a prompt
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 15_000;

const EXTRACTION_INSTRUCTIONS: &str = r#"You extract job postings from the HTML of job search result pages.

For every job posting on the page, report these fields:
- title: the job title
- company: the hiring company
- location: where the job is, including remote status when mentioned
- salary: pay as written on the page
- description: a short summary of the responsibilities
- application_link: the URL to view or apply for the job
- skills: the 3 to 5 most important required skills, as a list of strings
- job_type: Full-time, Part-time, Contract, Internship, ...
- date_posted: when the job was posted, as shown on the page

Reply with strict JSON only, no markdown and no commentary, shaped exactly like:
{
    "jobs": [
        {
            "title": "Senior Software Engineer",
            "company": "Tech Company Inc.",
            "location": "New York, NY (Remote Available)",
            "salary": "$120,000 - $150,000",
            "description": "Builds and operates backend services...",
            "application_link": "https://example.com/apply",
            "skills": ["Python", "JavaScript", "AWS"],
            "job_type": "Full-time",
            "date_posted": "2023-03-15"
        }
    ]
}

Use "Not specified" for any field the page does not show.
If the page has no job postings, or you cannot identify any, reply with:
{"jobs": [], "error": "No job listings found or unable to parse the page."}"#;

/// Builds one provider request per rendered page.
///
/// Page text is cut to the first `max_content_chars` characters. The cut is
/// a plain prefix: listings past the limit are silently lost.
#[derive(Debug, Clone)]
pub struct ExtractionPromptBuilder {
    max_content_chars: usize,
    strip_markup: bool,
}

impl Default for ExtractionPromptBuilder {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            strip_markup: false,
        }
    }
}

impl ExtractionPromptBuilder {
    pub fn with_max_content_chars(mut self, max_chars: usize) -> Self {
        self.max_content_chars = max_chars;
        self
    }

    /// Reduce pages to visible text before truncating
    pub fn with_strip_markup(mut self, strip: bool) -> Self {
        self.strip_markup = strip;
        self
    }

    pub fn build(&self, page: PageContent) -> ExtractionRequest {
        if !page.success {
            return Self::troubleshooting(&page);
        }

        let content = if self.strip_markup {
            visible_text(&page.raw_text)
        } else {
            page.raw_text
        };
        let truncated = truncate_chars(&content, self.max_content_chars);
        if truncated.len() < content.len() {
            debug!(
                "Truncated page content for {} to {} characters",
                page.url, self.max_content_chars
            );
        }

        ExtractionRequest {
            kind: RequestKind::Extraction,
            system: Some(EXTRACTION_INSTRUCTIONS.to_string()),
            user: format!(
                "Extract job listings from this HTML content:\n\n{}\n\nIf the HTML is truncated, focus on extracting what you can see.",
                truncated
            ),
        }
    }

    fn troubleshooting(page: &PageContent) -> ExtractionRequest {
        let reason = page.failure.as_deref().unwrap_or("unknown error");
        ExtractionRequest {
            kind: RequestKind::Troubleshooting,
            system: None,
            user: format!(
                "The page couldn't be crawled ({}: {}). Please provide guidance on troubleshooting web scraping issues.",
                page.url, reason
            ),
        }
    }
}
