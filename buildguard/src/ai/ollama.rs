//! Ollama Client for Local AI
//!
//! Lets the arbiter run offline against a local Ollama server.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::provider::{AIProvider, ModelInfo};
use crate::ai::AIError;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for interacting with Ollama
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32, // max tokens
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct OllamaModelList {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Check if Ollama is running and the model is pulled
    pub async fn health_check(&self) -> Result<bool, AIError> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    let models: OllamaModelList = response
                        .json()
                        .await
                        .map_err(|e| AIError::ParseError(e.to_string()))?;
                    Ok(models
                        .models
                        .iter()
                        .any(|m| m.name.starts_with(&self.model) || self.model.starts_with(&m.name)))
                } else {
                    Ok(false)
                }
            }
            Err(_) => Ok(false), // Ollama not running
        }
    }

    /// Generate a completion
    pub async fn generate(&self, prompt: &str) -> Result<String, AIError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: 0.0,
                num_predict: 1500,
            },
        };

        tracing::debug!("Sending arbitration request to Ollama: {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(AIError::RequestFailed)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AIError::ApiError { status, message });
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AIError::ParseError(e.to_string()))?;

        Ok(ollama_response.response)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl AIProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    async fn complete(&self, prompt: &str) -> Result<String, AIError> {
        self.generate(prompt).await
    }

    fn model_info(&self) -> ModelInfo {
        // Estimate context window based on model name
        let context_window = if self.model.contains("70b") {
            8192
        } else if self.model.contains("mixtral") {
            32768
        } else {
            4096
        };

        ModelInfo {
            provider: "ollama".to_string(),
            model_name: self.model.clone(),
            is_local: true,
            context_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = OllamaClient::default();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model(), "llama3.1:8b");
        assert!(client.model_info().is_local);
    }

    #[test]
    fn test_custom_url_trailing_slash() {
        let client = OllamaClient::new(Some("http://gpu-box:11434/".to_string()), None);
        assert_eq!(client.base_url(), "http://gpu-box:11434");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let client = OllamaClient::new(Some("http://127.0.0.1:9".to_string()), None);
        assert!(!client.is_available().await);
    }
}
