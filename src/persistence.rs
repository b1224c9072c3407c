// src/persistence.rs
//! CSV and JSON files for a final record set

use crate::types::JobRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// One CSV row; skills flattened to a single cell
#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    salary: &'a str,
    description: &'a str,
    application_link: &'a str,
    skills: String,
    job_type: &'a str,
    date_posted: &'a str,
    source: &'static str,
}

impl<'a> From<&'a JobRecord> for CsvRow<'a> {
    fn from(record: &'a JobRecord) -> Self {
        Self {
            title: &record.title,
            company: &record.company,
            location: &record.location,
            salary: &record.salary,
            description: &record.description,
            application_link: &record.application_link,
            skills: record.skills_joined(),
            job_type: &record.job_type,
            date_posted: &record.date_posted,
            source: record.source.as_str(),
        }
    }
}

pub struct JobWriter;

impl JobWriter {
    /// Write one row per record. Returns the number of rows written.
    ///
    /// An empty set is a no-op: nothing is created and 0 is returned.
    pub async fn write_csv(records: &[JobRecord], path: &Path) -> Result<usize> {
        if records.is_empty() {
            warn!("No jobs data to save, skipping {}", path.display());
            return Ok(0);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer
                .serialize(CsvRow::from(record))
                .context("Failed to serialize CSV row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV data: {}", e))?;

        Self::write_file(path, &bytes).await?;
        info!("Successfully saved {} jobs to {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Write the records as a JSON array indented with 4 spaces
    pub async fn write_json(records: &[JobRecord], path: &Path) -> Result<usize> {
        if records.is_empty() {
            warn!("No jobs data to save, skipping {}", path.display());
            return Ok(0);
        }

        let mut bytes = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        records
            .serialize(&mut serializer)
            .context("Failed to serialize jobs to JSON")?;

        Self::write_file(path, &bytes).await?;
        info!("Successfully saved {} jobs to {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Load a result set previously written by [`JobWriter::write_json`]
    pub async fn read_json(path: &Path) -> Result<Vec<JobRecord>> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse jobs from {}", path.display()))
    }

    async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobSource;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("jobscout-test-{}", uuid::Uuid::new_v4()))
    }

    fn records() -> Vec<JobRecord> {
        vec![
            JobRecord::unspecified(JobSource::Indeed)
                .with_title("Rust Engineer")
                .with_company("Acme, Inc.")
                .with_skills(["Rust", "SQL"]),
            JobRecord::unspecified(JobSource::LinkedIn).with_title("Data Scientist"),
        ]
    }

    #[tokio::test]
    async fn test_write_csv() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("jobs.csv");

        let written = JobWriter::write_csv(&records(), &path).await.unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("title,company,location,salary,description,application_link,skills,job_type,date_posted,source")
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("Rust Engineer,\"Acme, Inc.\""));
        assert!(first.contains("\"Rust, SQL\""));
        assert!(first.ends_with(",Indeed"));
        assert_eq!(lines.count(), 1);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_write_json_and_read_back() {
        let dir = scratch_dir();
        let path = dir.join("jobs.json");
        let original = records();

        JobWriter::write_json(&original, &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n    {\n        \"title\""));
        assert_eq!(JobWriter::read_json(&path).await.unwrap(), original);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_empty_set_writes_nothing() {
        let dir = scratch_dir();
        let csv_path = dir.join("jobs.csv");
        let json_path = dir.join("jobs.json");

        assert_eq!(JobWriter::write_csv(&[], &csv_path).await.unwrap(), 0);
        assert_eq!(JobWriter::write_json(&[], &json_path).await.unwrap(), 0);
        assert!(!csv_path.exists());
        assert!(!json_path.exists());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_an_error() {
        let path = scratch_dir().join("missing.json");
        assert!(JobWriter::read_json(&path).await.is_err());
    }
}
