//! Google Gemini provider implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use studio_core::contains_provider_key_error;

use crate::protocol::gemini::{GeminiErrorEnvelope, GeminiRequest, GeminiResponse};
use crate::provider::{LLMError, LLMProvider, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name (e.g., "gemini-1.5-flash", "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        log::debug!("Gemini request to model '{}'", self.model);
        let request = GeminiRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(classify_error(status, &text));
        }

        let body: GeminiResponse = response.json().await?;
        body.text().ok_or_else(|| {
            let reason = body
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.clone())
                .or_else(|| body.prompt_feedback.as_ref().map(|feedback| feedback.to_string()))
                .unwrap_or_else(|| "no candidates".to_string());
            LLMError::EmptyResponse(reason)
        })
    }
}

/// Gemini reports a bad key as HTTP 400 with an explanatory message,
/// so the body is inspected as well as the status.
fn classify_error(status: StatusCode, body: &str) -> LLMError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || contains_provider_key_error(&message)
    {
        log::error!("Gemini rejected credentials: HTTP {}", status);
        return LLMError::Auth(format!(
            "Gemini authentication failed: {}. Please check your API key.",
            message
        ));
    }

    log::error!("Gemini API error: HTTP {}: {}", status, message);
    LLMError::Api(format!("Gemini API error: HTTP {}: {}", status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider() {
        let provider = GeminiProvider::new("test_key");
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_chained_builders() {
        let provider = GeminiProvider::new("test_key")
            .with_base_url("https://custom.api.com/")
            .with_model("gemini-1.5-pro");

        assert_eq!(provider.base_url, "https://custom.api.com");
        assert_eq!(provider.model, "gemini-1.5-pro");
        assert_eq!(
            provider.endpoint(),
            "https://custom.api.com/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn bad_key_message_maps_to_auth_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let error = classify_error(StatusCode::BAD_REQUEST, body);
        assert!(error.is_auth());
        assert!(error.to_string().contains("API key not valid"));
    }

    #[test]
    fn other_failures_map_to_api_error() {
        let error = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
        assert!(matches!(error, LLMError::Api(ref msg) if msg.contains("upstream exploded")));
    }

    #[test]
    fn forbidden_is_auth_error() {
        assert!(classify_error(StatusCode::FORBIDDEN, "{}").is_auth());
    }
}
