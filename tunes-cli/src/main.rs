mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunes_config::ConfigLoader;

use cli::{Cli, Command};
use commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let load = loader.load()?;
    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }

    let app = App::new(load.config)?;
    match cli.command {
        Command::Search {
            term,
            media,
            limit,
            json,
        } => app.search(&term, media, limit, json).await,
        Command::Artist { id, entity, limit } => {
            app.artist(id, entity, limit).await
        }
        Command::Artwork { term, media, limit } => {
            app.artwork(&term, media, limit).await
        }
    }
}
