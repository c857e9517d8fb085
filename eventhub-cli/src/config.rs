//! Environment loading and backend selection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use eventhub_server::db::{self, ConnectionManager, MemoryConnector, MemoryStore, PgConnector};
use eventhub_server::DatabaseConfig;

/// Files checked in the working directory, highest priority first.
const DOTENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load environment variables from .env files in the working directory.
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. `.env.local`
/// 3. `.env`
///
/// dotenvy never overwrites a variable that is already set, so loading the
/// higher-priority file first is enough.
pub fn load_dotenv() -> Vec<PathBuf> {
    load_dotenv_from(Path::new("."))
}

fn load_dotenv_from(dir: &Path) -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    for name in DOTENV_FILES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match dotenvy::from_path(&path) {
            Ok(()) => {
                debug!("Loaded env file: {}", path.display());
                loaded.push(path);
            }
            Err(e) => debug!("Failed to load {}: {}", path.display(), e),
        }
    }

    loaded
}

/// Where events are read from
#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    /// Database URL (overrides DATABASE_URL from the environment or .env files)
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Read events from a JSON fixture file instead of Postgres
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "database_url")]
    pub fixture: Option<PathBuf>,
}

/// Connection manager selected from [`BackendArgs`]
pub enum Backend {
    Postgres(Arc<ConnectionManager<PgConnector>>),
    Fixture(Arc<ConnectionManager<MemoryConnector>>),
}

impl BackendArgs {
    /// Build the connection manager for this invocation.
    ///
    /// Without `--database-url` or `--fixture` the process-wide shared
    /// manager is used and `DATABASE_URL` is read on first connect.
    pub fn backend(&self) -> Result<Backend> {
        if let Some(path) = &self.fixture {
            let store = MemoryStore::from_json_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            let connector = MemoryConnector::new(store);
            return Ok(Backend::Fixture(Arc::new(ConnectionManager::new(connector))));
        }

        if let Some(url) = &self.database_url {
            info!("Using database URL from --database-url");
            let config = DatabaseConfig {
                url: Some(url.clone()),
                ..DatabaseConfig::from_env()
            };
            let connector = PgConnector::with_config(config);
            return Ok(Backend::Postgres(Arc::new(ConnectionManager::new(connector))));
        }

        Ok(Backend::Postgres(db::shared()))
    }
}
