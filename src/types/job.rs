// src/types/job.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel used for every field the page did not provide
pub const NOT_SPECIFIED: &str = "Not specified";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

/// Job board a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobSource {
    Indeed,
    LinkedIn,
    Glassdoor,
}

impl JobSource {
    pub const ALL: [JobSource; 3] = [JobSource::Indeed, JobSource::LinkedIn, JobSource::Glassdoor];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::Indeed => "Indeed",
            JobSource::LinkedIn => "LinkedIn",
            JobSource::Glassdoor => "Glassdoor",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indeed" => Ok(JobSource::Indeed),
            "linkedin" => Ok(JobSource::LinkedIn),
            "glassdoor" => Ok(JobSource::Glassdoor),
            other => Err(format!("Unsupported source: {}", other)),
        }
    }
}

/// One job listing extracted from a results page.
///
/// Every text field is always populated; unknown values carry
/// [`NOT_SPECIFIED`]. Deserializing a saved record with missing keys
/// fills them the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default = "not_specified")]
    pub title: String,
    #[serde(default = "not_specified")]
    pub company: String,
    #[serde(default = "not_specified")]
    pub location: String,
    #[serde(default = "not_specified")]
    pub salary: String,
    #[serde(default = "not_specified")]
    pub description: String,
    #[serde(default = "not_specified", alias = "applicationLink")]
    pub application_link: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "not_specified", alias = "jobType")]
    pub job_type: String,
    #[serde(default = "not_specified", alias = "datePosted")]
    pub date_posted: String,
    pub source: JobSource,
}

impl JobRecord {
    /// Record with every field set to the sentinel
    pub fn unspecified(source: JobSource) -> Self {
        Self {
            title: not_specified(),
            company: not_specified(),
            location: not_specified(),
            salary: not_specified(),
            description: not_specified(),
            application_link: not_specified(),
            skills: Vec::new(),
            job_type: not_specified(),
            date_posted: not_specified(),
            source,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = salary.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Skills joined the way tabular outputs expect them
    pub fn skills_joined(&self) -> String {
        self.skills.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_str_is_case_insensitive() {
        assert_eq!("Indeed".parse::<JobSource>(), Ok(JobSource::Indeed));
        assert_eq!(" LINKEDIN ".parse::<JobSource>(), Ok(JobSource::LinkedIn));
        assert_eq!("glassdoor".parse::<JobSource>(), Ok(JobSource::Glassdoor));
        assert!("monster".parse::<JobSource>().is_err());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let record: JobRecord =
            serde_json::from_str(r#"{"title": "Engineer", "source": "Indeed"}"#).unwrap();
        assert_eq!(record.title, "Engineer");
        assert_eq!(record.company, NOT_SPECIFIED);
        assert_eq!(record.date_posted, NOT_SPECIFIED);
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_deserialize_accepts_camel_case_keys() {
        let record: JobRecord = serde_json::from_str(
            r#"{"applicationLink": "https://x.test/apply", "jobType": "Contract", "source": "LinkedIn"}"#,
        )
        .unwrap();
        assert_eq!(record.application_link, "https://x.test/apply");
        assert_eq!(record.job_type, "Contract");
    }

    #[test]
    fn test_skills_joined() {
        let record = JobRecord::unspecified(JobSource::Glassdoor).with_skills(["Rust", "SQL"]);
        assert_eq!(record.skills_joined(), "Rust, SQL");
    }
}
