// src/aggregator.rs
//! Deduplication and filtering over a finished run's records.

use crate::types::{JobRecord, JobSource};
use crate::utils::normalize_key;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Words that mark a listing as remote
pub const REMOTE_MARKERS: [&str; 4] = ["remote", "work from home", "wfh", "virtual"];

static SALARY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[,\d]*").expect("salary pattern is valid"));

/// User-supplied filters. Criteria are ANDed; values within one criterion are ORed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub remote_only: bool,
    pub min_salary: Option<f64>,
}

impl FilterCriteria {
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_remote_only(mut self, remote_only: bool) -> Self {
        self.remote_only = remote_only;
        self
    }

    pub fn with_min_salary(mut self, min_salary: f64) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.locations.is_empty()
            && !self.remote_only
            && self.min_salary.is_none()
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        self.matches_keywords(record)
            && self.matches_locations(record)
            && (!self.remote_only || is_remote(record))
            && self.matches_salary(record)
    }

    fn matches_keywords(&self, record: &JobRecord) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = record.title.to_lowercase();
        let description = record.description.to_lowercase();
        let skills: Vec<String> = record.skills.iter().map(|s| s.to_lowercase()).collect();

        self.keywords.iter().map(|k| k.to_lowercase()).any(|keyword| {
            title.contains(&keyword)
                || description.contains(&keyword)
                || skills.iter().any(|skill| skill.contains(&keyword))
        })
    }

    fn matches_locations(&self, record: &JobRecord) -> bool {
        if self.locations.is_empty() {
            return true;
        }
        let location = record.location.to_lowercase();
        self.locations
            .iter()
            .any(|wanted| location.contains(&wanted.to_lowercase()))
    }

    fn matches_salary(&self, record: &JobRecord) -> bool {
        match self.min_salary {
            Some(min) if min > 0.0 => extract_salary_value(&record.salary) >= min,
            _ => true,
        }
    }
}

/// First number in a free-text salary, thousands separators dropped.
///
/// Best effort: no currency or period handling, and for a range only the
/// lower bound is seen. Anything without digits is 0.
pub fn extract_salary_value(salary: &str) -> f64 {
    SALARY_NUMBER
        .find(salary)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn is_remote(record: &JobRecord) -> bool {
    let haystacks = [
        record.location.to_lowercase(),
        record.title.to_lowercase(),
        record.description.to_lowercase(),
    ];
    REMOTE_MARKERS
        .iter()
        .any(|marker| haystacks.iter().any(|text| text.contains(marker)))
}

/// Read-only view over the records handed over after a run.
pub struct JobAggregator<'a> {
    records: &'a [JobRecord],
}

impl<'a> JobAggregator<'a> {
    pub fn new(records: &'a [JobRecord]) -> Self {
        Self { records }
    }

    /// One record per (title, company, source) group, first occurrence kept
    pub fn dedupe(&self) -> Vec<JobRecord> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| {
                seen.insert((
                    normalize_key(&record.title),
                    normalize_key(&record.company),
                    record.source,
                ))
            })
            .cloned()
            .collect()
    }

    /// Deduplicated records passing every criterion
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<JobRecord> {
        let mut records = self.dedupe();
        if !criteria.is_empty() {
            records.retain(|record| criteria.matches(record));
        }
        records
    }

    /// Record count per source, in first-seen order
    pub fn source_distribution(&self) -> Vec<(JobSource, usize)> {
        let mut counts: Vec<(JobSource, usize)> = Vec::new();
        for record in self.records {
            match counts.iter_mut().find(|(source, _)| *source == record.source) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.source, 1)),
            }
        }
        counts
    }
}
