//! HTTP client for the studio server.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use studio_core::ImageSuggestion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("{0}")]
    Server(String),

    #[error("server returned no images")]
    NoImages,
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Every endpoint answers either with its payload or with `{"error": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure { error: String },
    Success(T),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanionReply {
    pub answer: String,
    pub context_summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageReply {
    pub original_prompt: String,
    pub images: Vec<ImageSuggestion>,
}

#[derive(Deserialize)]
struct EssayReply {
    essay: String,
}

#[derive(Deserialize)]
struct PoemReply {
    poem: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub async fn companion(&self, prompt: &str, context: &str) -> Result<CompanionReply> {
        let request = self
            .client
            .post(self.url("/companion"))
            .query(&[("prompt", prompt), ("context", context)]);
        self.send(request).await
    }

    pub async fn essay(&self, topic: &str, length: u32) -> Result<String> {
        let request = self
            .client
            .get(self.url("/essay"))
            .query(&[("topic", topic.to_string()), ("length", length.to_string())]);
        let reply: EssayReply = self.send(request).await?;
        Ok(reply.essay)
    }

    pub async fn poem(&self, topic: &str, length: u32) -> Result<String> {
        let request = self
            .client
            .get(self.url("/poem"))
            .query(&[("topic", topic.to_string()), ("length", length.to_string())]);
        let reply: PoemReply = self.send(request).await?;
        Ok(reply.poem)
    }

    pub async fn generate_image(&self, prompt: &str, num_images: u32) -> Result<ImageReply> {
        let request = self.client.get(self.url("/generate-image")).query(&[
            ("prompt", prompt.to_string()),
            ("num_images", num_images.to_string()),
        ]);
        let reply: ImageReply = self.send(request).await?;
        if reply.images.is_empty() {
            return Err(ClientError::NoImages);
        }
        Ok(reply)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        log::debug!("{} {}", status, response.url());

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        match response.json::<Envelope<T>>().await? {
            Envelope::Success(value) => Ok(value),
            Envelope::Failure { error } => Err(ClientError::Server(error)),
        }
    }
}
