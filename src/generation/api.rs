use std::time::Duration;

use reqwest::blocking::Client;
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::KiokuError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Connection settings for the chat-completions backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl BackendConfig {
    /// Reads `OPENAI_API_BASE`, `OPENAI_API_KEY` and `KIOKU_MODEL` from the
    /// environment, with defaults for everything but the key.
    pub fn from_env() -> Self {
        BackendConfig {
            base_url: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("KIOKU_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: String) -> Self {
        ChatMessage { role: "system".to_string(), content }
    }

    pub fn user(content: String) -> Self {
        ChatMessage { role: "user".to_string(), content }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    // Tolerates both a missing and an explicit-null choices field.
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

pub fn http_client() -> Result<Client, KiokuError> {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| KiokuError::Custom(format!("HTTP client build failed: {}", e)))
}

/// One blocking attempt against the chat-completions endpoint. Returns the
/// first choice's content, or `None` when the backend sends no choices.
pub fn complete(
    client: &Client,
    config: &BackendConfig,
    messages: &[ChatMessage],
) -> Result<Option<String>, KiokuError> {
    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    let body = serde_json::json!({
        "model": config.model,
        "messages": messages,
        "temperature": config.temperature,
    });

    let response = client.post(&url).bearer_auth(&config.api_key).json(&body).send()?;
    if !response.status().is_success() {
        return Err(KiokuError::Custom(format!(
            "HTTP error {} from {}",
            response.status(),
            url
        )));
    }

    let response: ChatResponse = response.json()?;
    Ok(first_choice_content(response))
}

fn first_choice_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
}
