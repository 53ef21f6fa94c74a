//! Command-line front end for the semantic cache
//!
//! Cache settings come from the environment (and `.env`); the global flags
//! below override them for a single invocation.

mod commands;

use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, CacheConfig, CacheOptions, EmbeddingProviderKind};
use crate::infrastructure::logging;
use crate::infrastructure::services::{SemanticCacheService, DEFAULT_SEARCH_LIMIT};
use crate::infrastructure::vector_store::MEMORY_SCHEME;

pub use commands::execute;

/// Semantic cache - key/value lookups matched by meaning
#[derive(Parser)]
#[command(name = "semantic-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub cache: CacheArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Explicit overrides of the environment configuration
#[derive(Args, Clone, Debug, Default)]
pub struct CacheArgs {
    /// Similarity a lookup must reach to count as a hit (0..=1)
    #[arg(long, global = true)]
    pub min_proximity: Option<f32>,

    /// Embedding provider: openai, gemini or voyage
    #[arg(long, global = true)]
    pub provider: Option<EmbeddingProviderKind>,

    /// Namespace; selects a separate backing table
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Vector store URI (local path or object storage URI)
    #[arg(long, global = true)]
    pub uri: Option<String>,
}

impl CacheArgs {
    pub fn to_options(&self) -> CacheOptions {
        CacheOptions {
            min_proximity: self.min_proximity,
            provider: self.provider,
            namespace: self.namespace.clone(),
            uri: self.uri.clone(),
            ..CacheOptions::default()
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Store a value under a key
    Set { key: String, value: String },

    /// Look up values by semantic match, one JSON line per key
    Get {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show the nearest entries with their similarity, ignoring the threshold
    Search {
        key: String,

        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Delete entries stored under exactly these keys
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Drop every entry in the current namespace
    Flush,
}

/// Run a parsed command line against the configured cache
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let app_config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&app_config.logging)?;

    let config = CacheConfig::resolve(cli.cache.to_options())?;
    ensure_persistent_uri(&config)?;
    let service = SemanticCacheService::from_config(&config)?;

    let mut stdout = std::io::stdout();
    let result = execute(&service, cli.command, &mut stdout).await;
    service.close().await;

    result
}

/// Reject process-local stores: their entries would vanish when the command exits
pub fn ensure_persistent_uri(config: &CacheConfig) -> anyhow::Result<()> {
    if config.uri().starts_with(MEMORY_SCHEME) {
        anyhow::bail!(
            "Vector store URI '{}' does not outlive a single command; \
             pass --uri or set SEMANTIC_CACHE_URI to a local path or object storage URI",
            config.uri()
        );
    }
    Ok(())
}
