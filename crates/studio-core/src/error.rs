use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("provider rejected the API key")]
    InvalidApiKey,

    #[error("response has no answer text")]
    MissingAnswer,

    #[error("response has no SUMMARY line")]
    MissingSummary,

    #[error("response contained no usable image prompts")]
    NoImagePrompts,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no conversation ID is available after {0}")]
    ConversationIdsExhausted(u64),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
