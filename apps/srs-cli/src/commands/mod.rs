//! Command handlers.
//!
//! Each handler takes the store, the parsed arguments, the current time and an
//! output writer, so the handlers can be driven from tests.

mod cards;
mod settings;
mod stats;
mod study;

use crate::cli::Command;
use anyhow::Result;
use card_store_sqlite::{SettingsRepository, SqliteCardStore};
use chrono::Utc;
use srs_engine::Engine;
use std::io;

pub fn run(command: Command, store: &mut SqliteCardStore) -> Result<()> {
    let mut out = io::stdout().lock();
    match command {
        Command::Add(args) => cards::add(store, args, Utc::now(), &mut out),
        Command::Import { file } => cards::import(store, &file, Utc::now(), &mut out),
        Command::Queue { filter, json } => {
            study::queue(store, &filter.to_filter(), json, Utc::now(), &mut out)
        }
        Command::Review(args) => study::review(store, &args, Utc::now(), &mut out),
        Command::Study { filter } => {
            let mut input = io::stdin().lock();
            study::study(store, &filter.to_filter(), &mut input, &mut out, Utc::now)
        }
        Command::Mastery { by, json } => stats::mastery(store, by.into(), json, Utc::now(), &mut out),
        Command::Settings(cmd) => settings::run(store, cmd, &mut out),
    }
}

/// Engine configured with the effective settings for `subject`.
fn engine_for(store: &SqliteCardStore, subject: Option<&str>) -> Result<Engine> {
    Ok(Engine::new(store.get_effective_settings(subject)?))
}
