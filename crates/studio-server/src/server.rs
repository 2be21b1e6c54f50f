use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use crate::handlers;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub gemini_base_url: String,
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/companion", web::post().to(handlers::companion::handler))
        .route("/essay", web::get().to(handlers::writing::essay))
        .route("/poem", web::get().to(handlers::writing::poem))
        .route("/generate-image", web::get().to(handlers::image::handler))
        .route("/health", web::get().to(handlers::health::handler));
}

pub async fn run_server(config: ServerConfig) -> io::Result<()> {
    log::info!(
        "Initializing server on {}:{} with model {}",
        config.host,
        config.port,
        config.model
    );
    let state = web::Data::new(AppState::from_config(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
