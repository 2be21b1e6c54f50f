use std::sync::Arc;

use studio_llm::{GeminiProvider, LLMProvider};

use crate::server::ServerConfig;

pub struct AppState {
    pub llm: Arc<dyn LLMProvider>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        log::info!(
            "Creating Gemini provider with base URL: {} and model: {}",
            config.gemini_base_url,
            config.model
        );

        let provider = GeminiProvider::new(config.api_key.clone())
            .with_base_url(config.gemini_base_url.clone())
            .with_model(config.model.clone());

        Self::new(Arc::new(provider))
    }
}
