//! `srs`: command-line front end for the spaced-repetition engine.
//!
//! # Usage
//!
//! ```text
//! srs add --front "2 + 2" --back "4" --subject math
//! srs study --subject math
//! srs mastery --by module
//! ```

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use card_store_sqlite::SqliteCardStore;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let path = config::database_path(cli.db)?;
    tracing::info!("Using card database {}", path.display());

    let mut store = SqliteCardStore::open(&path)
        .with_context(|| format!("opening card database {}", path.display()))?;

    commands::run(cli.command, &mut store)
}
