//! Colloquy — the interactive chat entry point.
//!
//! Loads configuration, resolves the system preamble, builds the remote
//! client, and hands control to the session loop. Any startup failure
//! terminates the process before the loop starts.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colloquy_config::AppConfig;
use colloquy_core::message::Entry;
use colloquy_providers::AzureOpenAiClient;
use colloquy_session::RequestAssembler;

#[derive(Parser)]
#[command(
    name = "colloquy",
    about = "Colloquy — interactive LLM chat with bounded history",
    version
)]
struct Cli {
    /// Path to a config file (default: colloquy.toml, or colloquy.dev.toml
    /// when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load_with_override(cli.config.as_deref())
        .context("Failed to load configuration")?;
    config
        .require_remote()
        .context("Remote completion service is not configured")?;

    let preamble_text = config
        .resolve_preamble()
        .context("Failed to load the system preamble")?;

    // require_remote() verified these are present.
    let client = AzureOpenAiClient::new(
        config.endpoint.clone().unwrap_or_default(),
        config.deployment.clone().unwrap_or_default(),
        config.api_key.clone().unwrap_or_default(),
    );

    let assembler = RequestAssembler::new(
        Entry::system(preamble_text),
        config.generation_params(),
        config.history_length,
    )
    .context("Failed to build the request assembler")?;

    colloquy_session::run(&assembler, &client, &config.messages)
        .await
        .context("Session loop failed")?;

    Ok(())
}
