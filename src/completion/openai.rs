// src/completion/openai.rs
use super::{CompletionClient, CompletionRequest};
use crate::error::{Result, ScrapeError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completions client for OpenAI and API-compatible providers.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn payload(request: &CompletionRequest) -> ChatRequest<'_> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });

        ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ScrapeError::Provider("Completion contained no message content".to_string()))
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("Sending completion request to {} (model: {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&Self::payload(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, error_text);
            return Err(ScrapeError::Provider(format!(
                "API returned error {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::Provider(format!("Failed to decode completion: {}", e)))?;

        let content = first_choice(chat)?;
        debug!("Received completion of {} characters", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json_mode: bool, system: Option<&str>) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            system: system.map(String::from),
            user: "Extract job listings".to_string(),
            json_mode,
        }
    }

    #[test]
    fn test_payload_with_system_prompt() {
        let req = request(false, Some("You extract jobs"));
        let value = serde_json::to_value(OpenAiClient::payload(&req)).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "Extract job listings");
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_payload_without_system_prompt_in_json_mode() {
        let req = request(true, None);
        let value = serde_json::to_value(OpenAiClient::payload(&req)).unwrap();

        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "{\"jobs\": []}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), r#"{"jobs": []}"#);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_choice(empty), Err(ScrapeError::Provider(_))));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client =
            OpenAiClient::new("key".to_string(), "http://localhost:9000/v1/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/v1");
    }
}
