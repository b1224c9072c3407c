// src/extraction/parser.rs
//! Provider output to typed job records.
//!
//! Decoding is strict JSON (after removing a surrounding markdown fence).
//! Past that point the shape is treated loosely: missing or null fields
//! become "Not specified", scalars are stringified, and entries that are
//! not objects are dropped.

use crate::error::ParseFailure;
use crate::types::{JobRecord, JobSource, NOT_SPECIFIED};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub struct ResponseParser;

impl ResponseParser {
    /// Parse one page's completion into records attributed to `source`.
    pub fn parse(raw_text: &str, source: JobSource) -> Result<Vec<JobRecord>, ParseFailure> {
        let body = strip_code_fence(raw_text);
        let value: Value =
            serde_json::from_str(body).map_err(|e| ParseFailure::new(raw_text, e.to_string()))?;

        let entries = match value {
            Value::Object(mut object) => match object.remove("jobs") {
                None | Some(Value::Null) => {
                    log_provider_note(&object);
                    return Ok(Vec::new());
                }
                Some(Value::Array(entries)) => {
                    if entries.is_empty() {
                        log_provider_note(&object);
                    }
                    entries
                }
                Some(other) => {
                    return Err(ParseFailure::new(
                        raw_text,
                        format!("\"jobs\" must be an array, found {}", type_name(&other)),
                    ))
                }
            },
            Value::Array(entries) => entries,
            other => {
                return Err(ParseFailure::new(
                    raw_text,
                    format!("expected a JSON object, found {}", type_name(&other)),
                ))
            }
        };

        let total = entries.len();
        let records: Vec<JobRecord> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(fields) => Some(record_from_fields(&fields, source)),
                other => {
                    debug!("Skipping non-object job entry: {}", type_name(&other));
                    None
                }
            })
            .collect();

        if records.len() < total {
            debug!("Dropped {} malformed job entries", total - records.len());
        }
        Ok(records)
    }
}

fn log_provider_note(object: &Map<String, Value>) {
    if let Some(note) = object.get("error").and_then(Value::as_str) {
        info!("Provider reported no listings: {}", note);
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn record_from_fields(fields: &Map<String, Value>, source: JobSource) -> JobRecord {
    JobRecord {
        title: text_field(fields, &["title"]),
        company: text_field(fields, &["company"]),
        location: text_field(fields, &["location"]),
        salary: text_field(fields, &["salary"]),
        description: text_field(fields, &["description"]),
        application_link: text_field(fields, &["application_link", "applicationLink"]),
        skills: skills_field(fields),
        job_type: text_field(fields, &["job_type", "jobType"]),
        date_posted: text_field(fields, &["date_posted", "datePosted"]),
        source,
    }
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(value_text))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn skills_field(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("skills") {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(Value::String(s)) if s.trim() != NOT_SPECIFIED => s
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
