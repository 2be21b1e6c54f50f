//! Essay and poem generation. Both return the model text verbatim.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use studio_core::contains_provider_key_error;

use crate::error::{Result, ServiceError};
use crate::prompts::{essay_prompt, poem_prompt};
use crate::state::AppState;

pub const DEFAULT_ESSAY_LENGTH: u32 = 100;
pub const DEFAULT_POEM_LENGTH: u32 = 30;

#[derive(Debug, Deserialize)]
pub struct EssayQuery {
    pub topic: String,
    #[serde(default = "default_essay_length")]
    pub length: u32,
}

#[derive(Debug, Deserialize)]
pub struct PoemQuery {
    pub topic: String,
    #[serde(default = "default_poem_length")]
    pub length: u32,
}

fn default_essay_length() -> u32 {
    DEFAULT_ESSAY_LENGTH
}

fn default_poem_length() -> u32 {
    DEFAULT_POEM_LENGTH
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EssayResponse {
    pub topic: String,
    pub length: u32,
    pub essay: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoemResponse {
    pub topic: String,
    pub length: u32,
    pub poem: String,
}

pub async fn essay(state: web::Data<AppState>, query: web::Query<EssayQuery>) -> Result<HttpResponse> {
    let EssayQuery { topic, length } = query.into_inner();
    log::info!("Essay request: topic={:?}, length={}", topic, length);

    let essay = generate_text(&state, &essay_prompt(&topic, length)).await?;

    Ok(HttpResponse::Ok().json(EssayResponse {
        topic,
        length,
        essay,
    }))
}

pub async fn poem(state: web::Data<AppState>, query: web::Query<PoemQuery>) -> Result<HttpResponse> {
    let PoemQuery { topic, length } = query.into_inner();
    log::info!("Poem request: topic={:?}, length={}", topic, length);

    let poem = generate_text(&state, &poem_prompt(&topic, length)).await?;

    Ok(HttpResponse::Ok().json(PoemResponse {
        topic,
        length,
        poem,
    }))
}

async fn generate_text(state: &AppState, prompt: &str) -> Result<String> {
    let text = state.llm.generate(prompt).await?;
    if contains_provider_key_error(&text) {
        return Err(ServiceError::InvalidApiKey);
    }
    Ok(text)
}
