//! OpenAI Chat Completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ai::provider::{AIProvider, ModelInfo};
use crate::ai::AIError;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const INITIAL_RETRY_DELAY_MS: u64 = 1000;

const SYSTEM_PROMPT: &str = "You are a PC hardware compatibility expert. Be exact about power budget arithmetic.";

pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: 0,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Point at an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Replays of the identical request after a failure or a 429
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, prompt: &str) -> Result<String, AIError> {
        if self.api_key.is_empty() {
            return Err(AIError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let mut retry_count = 0;
        let mut delay_ms = INITIAL_RETRY_DELAY_MS;

        loop {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let chat: ChatResponse = resp
                            .json()
                            .await
                            .map_err(|e| AIError::ParseError(format!("Failed to parse JSON: {}", e)))?;

                        return chat
                            .choices
                            .into_iter()
                            .next()
                            .map(|c| c.message.content)
                            .ok_or_else(|| {
                                AIError::InvalidResponse("Empty choices array in response".to_string())
                            });
                    } else if status.as_u16() == 429 {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|h| h.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(delay_ms / 1000);

                        if retry_count < self.max_retries {
                            retry_count += 1;
                            tracing::warn!(
                                "Rate limited. Retrying after {} seconds (attempt {}/{})",
                                retry_after,
                                retry_count,
                                self.max_retries
                            );
                            sleep(Duration::from_secs(retry_after)).await;
                            delay_ms *= 2;
                            continue;
                        }
                        return Err(AIError::RateLimited { retry_after });
                    } else {
                        let error_text = resp
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());

                        return Err(AIError::ApiError {
                            status: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    if retry_count < self.max_retries {
                        retry_count += 1;
                        tracing::warn!(
                            "Request failed: {}. Retrying in {}ms (attempt {}/{})",
                            e,
                            delay_ms,
                            retry_count,
                            self.max_retries
                        );
                        sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms *= 2;
                        continue;
                    }
                    return Err(AIError::RequestFailed(e));
                }
            }
        }
    }
}

#[async_trait]
impl AIProvider for OpenAIClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, prompt: &str) -> Result<String, AIError> {
        tracing::debug!("Sending arbitration request to OpenAI: {}", self.model);
        self.send_request(prompt).await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "openai".to_string(),
            model_name: self.model.clone(),
            is_local: false,
            context_window: 128_000,
        }
    }
}
