use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::cli::{self, Cli, LogFormat};
use catalog::{Catalog, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable with --format json
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "catalog=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    let config = cli.apply_to(Config::from_env());
    tracing::debug!(?config, "Configuration loaded");

    let catalog = Catalog::new(&config).await?;

    if let Some(output) = cli::run(cli.command, &catalog, cli.format, cli.quiet).await? {
        println!("{output}");
    }

    Ok(())
}
