// src/completion/mod.rs
pub mod openai;

use crate::error::Result;
use crate::types::ExtractionRequest;
use async_trait::async_trait;

pub use openai::OpenAiClient;

/// Everything a provider needs for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system: Option<String>,
    pub user: String,
    /// Ask the provider to constrain its output to a JSON object
    pub json_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            json_mode: false,
        }
    }
}

impl CompletionSettings {
    /// JSON mode only applies to extraction; troubleshooting asks for prose.
    pub fn request_for(&self, request: ExtractionRequest) -> CompletionRequest {
        let json_mode = self.json_mode && !request.is_degraded();
        CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system: request.system,
            user: request.user,
            json_mode,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
