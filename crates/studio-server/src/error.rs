use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use studio_core::ParseError;
use studio_llm::LLMError;
use thiserror::Error;

pub const GENERIC_ERROR: &str = "API ERROR From Server";
pub const INVALID_KEY_ERROR: &str = "API key not valid. Please check your Gemini API key.";

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Everything that can go wrong while serving a generation request.
///
/// Errors never surface as transport failures: the response is always
/// `200 OK` with an `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model call failed: {0}")]
    Llm(#[from] LLMError),

    #[error("unusable model output: {0}")]
    Parse(#[from] ParseError),

    #[error("provider reported an invalid API key")]
    InvalidApiKey,
}

impl ServiceError {
    pub fn is_credential_error(&self) -> bool {
        match self {
            ServiceError::Llm(error) => error.is_auth(),
            ServiceError::Parse(error) => *error == ParseError::InvalidApiKey,
            ServiceError::InvalidApiKey => true,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let message = if self.is_credential_error() {
            INVALID_KEY_ERROR
        } else {
            GENERIC_ERROR
        };
        ErrorBody {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        log::warn!("Request failed: {}", self);
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
