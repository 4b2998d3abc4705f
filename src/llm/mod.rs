pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid model endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model backend returned no candidates")]
    NoCandidates,
}

/// Text generation backend: one prompt in, one reply out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
