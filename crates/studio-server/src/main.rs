use clap::Parser;
use std::io;

use studio_llm::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use studio_server::logging::init_logging;
use studio_server::{run_server, ServerConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "studio-server")]
#[command(about = "Creative Studio API server backed by Gemini")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // A missing .env is fine; the key may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.log_level.is_some() {
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    if cli.api_key.trim().is_empty() {
        log::error!("GOOGLE_API_KEY is empty");
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "GOOGLE_API_KEY must not be empty",
        ));
    }

    log::info!("Starting Creative Studio server on {}:{}", cli.host, cli.port);
    log::info!("LLM Configuration:");
    log::info!("  Base URL: {}", cli.gemini_base_url);
    log::info!("  Model: {}", cli.model);

    run_server(ServerConfig {
        host: cli.host,
        port: cli.port,
        api_key: cli.api_key,
        model: cli.model,
        gemini_base_url: cli.gemini_base_url,
    })
    .await
}
