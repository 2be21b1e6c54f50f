use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use studio_core::parse_companion_response;

use crate::error::Result;
use crate::prompts::companion_prompt;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanionQuery {
    pub prompt: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanionResponse {
    pub answer: String,
    pub context_summary: String,
}

pub async fn handler(
    state: web::Data<AppState>,
    query: web::Query<CompanionQuery>,
) -> Result<HttpResponse> {
    log::info!(
        "Companion request ({} chars of prompt, {} chars of context)",
        query.prompt.len(),
        query.context.len()
    );

    let full_prompt = companion_prompt(&query.prompt, &query.context);
    let output = state.llm.generate(&full_prompt).await?;
    let parsed = parse_companion_response(&output)?;

    Ok(HttpResponse::Ok().json(CompanionResponse {
        answer: parsed.answer,
        context_summary: parsed.summary,
    }))
}
