//! AI Router
//!
//! Picks the arbiter backend by preference, falling back to whichever other
//! provider is usable.

use std::sync::Arc;

use crate::ai::ollama::OllamaClient;
use crate::ai::openai::OpenAIClient;
use crate::ai::provider::AIProvider;
use crate::config::ArbiterConfig;

/// Arbiter backends and the preference between them
pub struct AIRouter {
    openai_client: Option<Arc<OpenAIClient>>,
    ollama_client: Arc<OllamaClient>,
    preferred_provider: String,
}

impl AIRouter {
    /// Router wired from the arbiter settings. The key and Ollama URL come
    /// from the caller's environment, never from the config file.
    pub fn from_config(
        config: &ArbiterConfig,
        openai_api_key: Option<String>,
        ollama_url: Option<String>,
    ) -> Self {
        let preferred = config.preferred_provider.as_str();
        let model_for = |provider: &str| config.model.clone().filter(|_| preferred == provider);
        let url_for = |provider: &str| config.base_url.clone().filter(|_| preferred == provider);

        let openai_client = openai_api_key.filter(|k| !k.is_empty()).map(|key| {
            let mut client = OpenAIClient::new(key).with_max_retries(config.max_retries);
            if let Some(model) = model_for("openai") {
                client = client.with_model(model);
            }
            if let Some(url) = url_for("openai") {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        });

        let ollama_client = Arc::new(OllamaClient::new(
            ollama_url.or_else(|| url_for("ollama")),
            model_for("ollama"),
        ));

        Self {
            openai_client,
            ollama_client,
            preferred_provider: config.preferred_provider.clone(),
        }
    }

    /// Get the best available provider based on preference and availability
    pub async fn get_provider(&self) -> Option<Arc<dyn AIProvider>> {
        match self.preferred_provider.as_str() {
            "ollama" => {
                if self.ollama_client.is_available().await {
                    return Some(self.ollama_client.clone() as Arc<dyn AIProvider>);
                }
                if let Some(ref client) = self.openai_client {
                    return Some(client.clone() as Arc<dyn AIProvider>);
                }
            }
            _ => {
                if let Some(ref client) = self.openai_client {
                    return Some(client.clone() as Arc<dyn AIProvider>);
                }
                if self.ollama_client.is_available().await {
                    return Some(self.ollama_client.clone() as Arc<dyn AIProvider>);
                }
            }
        }

        None
    }
}
