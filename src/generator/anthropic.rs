//! Anthropic Messages API text generator
//!
//! Single-shot completion client: one prompt in, free text out. The engine
//! treats the response as opaque text; parsing happens downstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{GeneratorError, TextGenerator};
use crate::config::GeneratorConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Anthropic API client
pub struct AnthropicGenerator {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicGenerator {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            GeneratorError::InvalidResponse(format!("API key environment variable {} not set", config.api_key_env))
        })?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeneratorError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }

    /// Pull the text out of the response content blocks
    fn extract_text(&self, response: ApiResponse) -> Result<String, GeneratorError> {
        let text: String = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ApiContentBlock::Text { text } => Some(text),
                ApiContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(GeneratorError::InvalidResponse(
                "response contained no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generate: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(prompt);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "generate: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("x-api-key", self.api_key.clone())
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    debug!(attempt, "generate: request timed out");
                    last_error = Some(GeneratorError::Timeout(self.timeout));
                    continue;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "generate: network error");
                    last_error = Some(GeneratorError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "generate: retryable error");
                last_error = Some(GeneratorError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "generate: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(GeneratorError::ApiError { status, message: text });
            }

            debug!("generate: success");
            let api_response: ApiResponse = response.json().await?;
            return self.extract_text(api_response);
        }

        Err(last_error.unwrap_or_else(|| GeneratorError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ApiContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}
