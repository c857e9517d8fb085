//! eventhub CLI - event lookup service
//!
//! Entry point for the `eventhub` binary:
//! - `serve`: run the HTTP API (events list, by slug, similar by tag)
//! - `events`: run the same lookups from the command line
//!
//! Configuration comes from `.env.local`, `.env` and the environment
//! (`DATABASE_URL`), or from `--database-url` / `--fixture`.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "eventhub",
    author,
    version,
    about = "Event lookup service: list events, resolve slugs, find similar events by tag"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Look up events (list, show, similar)
    Events(commands::events::EventsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let loaded = config::load_dotenv();
    if !loaded.is_empty() {
        tracing::debug!("Loaded configuration from {} env file(s)", loaded.len());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Events(args) => commands::run_events(args).await?,
    }
    Ok(())
}
