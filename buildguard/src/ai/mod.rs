pub mod escalation;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod reply;
pub mod router;

use thiserror::Error;

// Re-export for convenience
pub use escalation::{EscalationCoordinator, ARBITER_RULE_ID, ARBITER_FAILURE_WARNING};
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
pub use prompts::{build_arbitration_prompt, ArbitrationRequest};
pub use provider::{AIProvider, ModelInfo};
pub use reply::{parse_reply, ArbiterReply};
pub use router::AIRouter;

#[derive(Debug, Error)]
pub enum AIError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Missing API key or no provider available")]
    MissingApiKey,
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Arbiter did not answer within {0} seconds")]
    Timeout(u64),
    #[error("Arbiter reply has no compatibility marker: {0}")]
    MalformedReply(String),
}
