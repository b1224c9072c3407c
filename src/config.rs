// src/config.rs
use crate::completion::openai::DEFAULT_BASE_URL;
use crate::completion::CompletionSettings;
use crate::error::ScrapeError;
use crate::extraction::DEFAULT_MAX_CONTENT_CHARS;
use crate::pacing::PacingPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const CONFIG_ENV_VAR: &str = "JOBSCOUT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "jobscout.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub provider: ProviderConfig,
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    pub json_mode: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let completion = CompletionSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: completion.model,
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 120,
            json_mode: completion.json_mode,
        }
    }
}

impl ProviderConfig {
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_mode: self.json_mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub render_timeout_seconds: u64,
    pub user_agent: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            render_timeout_seconds: 30,
            user_agent: None,
            window_width: 1366,
            window_height: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_seconds: f64,
    pub max_delay_seconds: f64,
    pub failure_multiplier: f64,
    pub max_delay_cap_seconds: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_seconds: 5.0,
            max_delay_seconds: 10.0,
            failure_multiplier: 1.0,
            max_delay_cap_seconds: 60.0,
        }
    }
}

impl PacingConfig {
    pub fn policy(&self) -> PacingPolicy {
        let secs = |value: f64| Duration::from_secs_f64(value.max(0.0));
        PacingPolicy::new(secs(self.min_delay_seconds), secs(self.max_delay_seconds))
            .with_failure_multiplier(self.failure_multiplier)
            .with_ceiling(secs(self.max_delay_cap_seconds))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_content_chars: usize,
    pub strip_markup: bool,
    pub consult_provider_on_render_failure: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            strip_markup: false,
            consult_provider_on_render_failure: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("gpt_jobs_data.csv"),
            json_path: PathBuf::from("gpt_jobs_data.json"),
        }
    }
}

impl ScraperConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `JOBSCOUT_CONFIG`, then
    /// `./jobscout.yaml` are tried, and built-in defaults are used when
    /// neither is present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from_file(Path::new(&path));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// API key from the explicit value, else from the configured env var.
    ///
    /// A missing key is fatal and must be reported before any crawling.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> std::result::Result<String, ScrapeError> {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match std::env::var(&self.provider.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ScrapeError::Configuration(format!(
                "API key is required. Pass --api-key or set the {} environment variable.",
                self.provider.api_key_env
            ))),
        }
    }
}
