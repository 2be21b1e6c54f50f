use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use studio_cli::{ApiClient, Generation, Studio};
use studio_core::{ConversationFormat, Exchange, FlatFileStore, ImageManifest, TopicEntry, TopicKind};

#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Creative Studio: essays, poems, companion chat and images")]
#[command(version)]
struct Cli {
    #[arg(long, env = "STUDIO_SERVER_URL", default_value = "http://localhost:8000")]
    server_url: String,

    /// Directory holding saved essays, poems, conversations and images
    #[arg(long, env = "STUDIO_STORAGE_DIR", default_value = "storage")]
    storage_dir: PathBuf,

    /// Conversation file format
    #[arg(long, value_enum, default_value_t = FormatArg::Tagged)]
    format: FormatArg,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Tagged,
    Jsonl,
}

impl From<FormatArg> for ConversationFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Tagged => ConversationFormat::Tagged,
            FormatArg::Jsonl => ConversationFormat::Jsonl,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an essay
    Essay {
        topic: String,
        /// Approximate length in words
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(20..=300))]
        length: u32,
    },
    /// Generate a poem
    Poem {
        topic: String,
        /// Approximate length in words
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(5..=100))]
        length: u32,
    },
    /// Generate image variations and cache them locally
    Image {
        prompt: String,
        /// Number of images
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=5))]
        count: u32,
    },
    /// Show the last saved result without calling the server
    Last {
        #[arg(value_enum)]
        kind: LastKind,
    },
    /// Send a message to the companion in a conversation
    Chat {
        /// Conversation ID
        id: u64,
        message: String,
    },
    /// Manage conversations
    #[command(subcommand)]
    Conversations(ConversationCommands),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LastKind {
    Essay,
    Poem,
    Image,
}

#[derive(Subcommand)]
enum ConversationCommands {
    /// List conversations
    List,
    /// Start a new conversation
    New,
    /// Delete a conversation
    Delete { id: u64 },
    /// Print a conversation transcript
    Show { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    log::debug!("Server URL: {}", cli.server_url);
    log::debug!("Storage dir: {:?}", cli.storage_dir);

    // One connection pool for server calls and image downloads.
    let http = reqwest::Client::new();
    let store = FlatFileStore::new(&cli.storage_dir)
        .with_format(cli.format.into())
        .with_http_client(http.clone());
    store.init().await?;
    let api = ApiClient::new(cli.server_url).with_http_client(http);
    let mut studio = Studio::new(api, store);

    match cli.command {
        Commands::Essay { topic, length } => {
            let result = studio.generate_topic(TopicKind::Essay, &topic, length).await?;
            render_topic(TopicKind::Essay, result);
        }
        Commands::Poem { topic, length } => {
            let result = studio.generate_topic(TopicKind::Poem, &topic, length).await?;
            render_topic(TopicKind::Poem, result);
        }
        Commands::Image { prompt, count } => match studio.generate_images(&prompt, count).await? {
            Generation::Fresh(manifest) => render_images(&manifest),
            Generation::Fallback { error, previous } => {
                println!("{}", format!("❌ Error generating images: {}", error).red());
                if let Some(manifest) = previous {
                    render_images(&manifest);
                }
            }
        },
        Commands::Last { kind } => match kind {
            LastKind::Essay => render_saved_topic(studio.last_topic(TopicKind::Essay).await?),
            LastKind::Poem => render_saved_topic(studio.last_topic(TopicKind::Poem).await?),
            LastKind::Image => {
                let manifest = studio.last_images().await?;
                if manifest.is_empty() {
                    println!("{}", "No saved images.".dimmed());
                } else {
                    render_images(&manifest);
                }
            }
        },
        Commands::Chat { id, message } => match studio.send(id, &message).await? {
            Generation::Fresh(exchange) => render_exchange(&exchange),
            Generation::Fallback { error, .. } => {
                println!("{}", format!("❌ Error: {}", error).red());
            }
        },
        Commands::Conversations(command) => match command {
            ConversationCommands::List => {
                let ids = studio.conversation_ids().await?;
                if ids.is_empty() {
                    println!(
                        "{}",
                        "No conversations found. Run `studio conversations new` to start.".dimmed()
                    );
                }
                for id in ids {
                    let name = studio.conversation_name(id).await?;
                    println!("{} {}", format!("[{}]", id).cyan(), name);
                }
            }
            ConversationCommands::New => {
                let id = studio.new_conversation().await?;
                println!("{}", format!("✅ Created conversation {}", id).green());
            }
            ConversationCommands::Delete { id } => {
                if studio.delete_conversation(id).await? {
                    println!("{}", format!("🗑  Deleted conversation {}", id).green());
                } else {
                    println!("{}", format!("Conversation {} did not exist", id).dimmed());
                }
            }
            ConversationCommands::Show { id } => {
                let exchanges = studio.exchanges(id).await?;
                if exchanges.is_empty() {
                    println!("{}", "(empty conversation)".dimmed());
                }
                for exchange in &exchanges {
                    render_exchange(exchange);
                }
            }
        },
    }

    Ok(())
}

fn render_topic(kind: TopicKind, result: Generation<TopicEntry>) {
    match result {
        Generation::Fresh(entry) => render_saved_topic(Some(entry)),
        Generation::Fallback { error, previous } => {
            println!("{}", format!("❌ Error generating {}: {}", kind, error).red());
            if previous.is_some() {
                println!("{}", "Showing the last saved result:".dimmed());
            }
            render_saved_topic(previous);
        }
    }
}

fn render_saved_topic(entry: Option<TopicEntry>) {
    match entry {
        Some(entry) => {
            println!("{}", format!("Topic: {}", entry.topic).bold());
            println!("{}", "─".repeat(50).dimmed());
            println!("{}", entry.text);
        }
        None => println!("{}", "Nothing saved yet.".dimmed()),
    }
}

fn render_images(manifest: &ImageManifest) {
    println!("{}", format!("Prompt: {}", manifest.prompt).bold());
    for (index, path) in manifest.paths.iter().enumerate() {
        let status = if path.exists() {
            "".normal()
        } else {
            " (download failed)".yellow()
        };
        println!("  Variation {}: {}{}", index + 1, path.display(), status);
    }
}

fn render_exchange(exchange: &Exchange) {
    println!("{} {}", "You:".bold().cyan(), exchange.prompt);
    println!("{} {}", "Companion:".bold().green(), exchange.answer);
    println!();
}
