use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl LLMError {
    pub fn is_auth(&self) -> bool {
        matches!(self, LLMError::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send a single prompt and return the full text of the reply.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
