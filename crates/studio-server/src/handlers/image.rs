use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use studio_core::{image_url_for, parse_image_prompts, ImageSuggestion};

use crate::error::Result;
use crate::prompts::image_prompts_request;
use crate::state::AppState;

pub const DEFAULT_NUM_IMAGES: u32 = 2;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub prompt: String,
    #[serde(default = "default_num_images")]
    pub num_images: u32,
}

fn default_num_images() -> u32 {
    DEFAULT_NUM_IMAGES
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub original_prompt: String,
    pub images: Vec<ImageSuggestion>,
}

/// Asks the model for refined prompts and turns each into a Pollinations URL.
/// No image bytes pass through the server.
pub async fn handler(state: web::Data<AppState>, query: web::Query<ImageQuery>) -> Result<HttpResponse> {
    let ImageQuery { prompt, num_images } = query.into_inner();
    log::info!("Image request: prompt={:?}, num_images={}", prompt, num_images);

    let output = state
        .llm
        .generate(&image_prompts_request(&prompt, num_images))
        .await?;
    let refined = parse_image_prompts(&output, num_images as usize)?;

    let images = refined
        .into_iter()
        .map(|refined_prompt| ImageSuggestion {
            image_url: image_url_for(&refined_prompt),
            prompt: refined_prompt,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ImageResponse {
        original_prompt: prompt,
        images,
    }))
}
