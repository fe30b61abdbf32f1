//! OpenAI-compatible chat-completions client
//!
//! Works against any provider exposing `POST {base_url}/chat/completions`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::error::ConfigError;
use crate::llm::client::{LlmClient, LlmError};
use crate::llm::types::{CompletionRequest, CompletionResponse, Role, Usage};

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl From<&LlmConfig> for OpenAiConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// OpenAI-compatible API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
    usage: Mutex<Usage>,
}

impl OpenAiClient {
    /// Create a client with an explicit API key
    pub fn new(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("llm.api_key"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "llm",
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Mutex::new(Usage::default()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content
                })
            })
            .collect();

        json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature
        })
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse, LlmError> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse(format!("missing choices[0].message.content in {}", body)))?
            .to_string();

        let usage = body
            .get("usage")
            .map(|u| {
                Usage::new(
                    u["prompt_tokens"].as_u64().unwrap_or(0),
                    u["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        if let Ok(mut total) = self.usage.lock() {
            total.add(&usage);
        }

        Ok(CompletionResponse { content, usage })
    }

    /// Send a request to the API
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(LlmError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}
