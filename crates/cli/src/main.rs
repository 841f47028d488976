//! ThreadGPT CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write the default config
//! - `chat`    — Local REPL through the full relay pipeline
//! - `reply`   — Answer the latest message in a Discord thread
//! - `doctor`  — Diagnose configuration and connectivity

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "threadgpt",
    about = "ThreadGPT — relay Discord threads to a chat-completion API",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Onboard,

    /// Chat locally through the relay pipeline
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Summarize older history before each completion
        #[arg(long)]
        summarize: bool,
    },

    /// Reply in a Discord thread based on its history
    Reply {
        /// Discord thread (channel) ID
        #[arg(short, long)]
        thread: String,

        /// Summarize older history before the completion
        #[arg(long)]
        summarize: bool,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message, summarize } => commands::chat::run(message, summarize).await?,
        Commands::Reply { thread, summarize } => commands::reply::run(thread, summarize).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
