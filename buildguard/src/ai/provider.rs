//! AI Provider Trait
//!
//! Defines a common interface for arbiter backends (OpenAI, Ollama, test doubles).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::AIError;

/// Information about an AI model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider name (e.g., "openai", "ollama")
    pub provider: String,

    /// Model name (e.g., "gpt-4o-mini", "llama3.1:8b")
    pub model_name: String,

    /// Whether this is a local model
    pub is_local: bool,

    /// Context window size in tokens
    pub context_window: usize,
}

/// Common trait for all arbiter providers
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available/configured
    async fn is_available(&self) -> bool;

    /// Send one prompt and return the raw text reply
    async fn complete(&self, prompt: &str) -> Result<String, AIError>;

    /// Get model info
    fn model_info(&self) -> ModelInfo;
}
