//! HTTP server command
//!
//! Runs the event API over Postgres, or over a JSON fixture for local work.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use eventhub_server::http::{run_server, ServerConfig};
use eventhub_server::EventRepository;

use crate::config::{Backend, BackendArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting eventhub server on {}", args.bind);

    // The database connection is established on the first request
    let served = match args.backend.backend()? {
        Backend::Postgres(manager) => run_server(EventRepository::new(manager), config).await,
        Backend::Fixture(manager) => run_server(EventRepository::new(manager), config).await,
    };

    served.context("Server error")
}
