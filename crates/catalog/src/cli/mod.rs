//! CLI command definitions.

pub mod authors;
pub mod books;

use clap::{Parser, Subcommand, ValueEnum};

use catalog_core::cache::CacheErrorPolicy;

use crate::config::Config;
use crate::state::Catalog;

/// Author and book catalog backed by a read cache.
#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log line format (written to stderr).
    #[arg(long, global = true, default_value = "text", env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// SQLite database path.
    #[arg(long, global = true)]
    pub sqlite_path: Option<String>,

    /// Cache TTL in seconds.
    #[arg(long, global = true)]
    pub cache_ttl: Option<u64>,

    /// Reaction to cache failures on reads: `propagate` or `bypass`.
    #[arg(long, global = true)]
    pub cache_error_policy: Option<CacheErrorPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Overlays command-line flags on a configuration loaded from the environment.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.clone();
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl_seconds = ttl;
        }
        if let Some(policy) = self.cache_error_policy {
            config.cache_error_policy = policy;
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Author management.
    Authors(authors::AuthorsCommand),
    /// Book management.
    Books(books::BooksCommand),
}

/// Runs a command and returns what should be printed, if anything.
pub async fn run(
    command: Commands,
    catalog: &Catalog,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<Option<String>> {
    match command {
        Commands::Authors(cmd) => authors::run(cmd.action, catalog, format, quiet).await,
        Commands::Books(cmd) => books::run(cmd.action, catalog, format, quiet).await,
    }
}
