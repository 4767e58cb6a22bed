//! Adding and importing cards.

use crate::cli::AddArgs;
use anyhow::{ensure, Context, Result};
use card_store_sqlite::SqliteCardStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use srs_engine::{Card, CardStore, Difficulty};
use std::io::Write;
use std::path::Path;

/// One entry of an import file.
#[derive(Debug, Deserialize)]
struct ImportCard {
    front: String,
    back: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    tags: Vec<String>,
}

impl ImportCard {
    fn into_card(self, now: DateTime<Utc>) -> Card {
        Card {
            subject: self.subject,
            module: self.module,
            ..Card::new(self.front, self.back, now)
                .with_difficulty(self.difficulty.unwrap_or_default())
                .with_tags(self.tags)
        }
    }
}

impl From<AddArgs> for ImportCard {
    fn from(args: AddArgs) -> Self {
        Self {
            front: args.front,
            back: args.back,
            subject: args.subject,
            module: args.module,
            difficulty: Some(args.difficulty.into()),
            tags: args.tags,
        }
    }
}

pub fn add(
    store: &mut SqliteCardStore,
    args: AddArgs,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    ensure!(!args.front.trim().is_empty(), "card front must not be empty");
    ensure!(!args.back.trim().is_empty(), "card back must not be empty");

    let card = ImportCard::from(args).into_card(now);

    store.save(&card)?;
    writeln!(out, "Added card {}", card.id)?;
    Ok(())
}

pub fn import(
    store: &mut SqliteCardStore,
    path: &Path,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading card file {}", path.display()))?;
    let cards = parse_import(&raw, now)?;
    store.save_many(&cards)?;
    tracing::info!(count = cards.len(), "imported cards");
    writeln!(out, "Imported {} cards", cards.len())?;
    Ok(())
}

fn parse_import(raw: &str, now: DateTime<Utc>) -> Result<Vec<Card>> {
    let entries: Vec<ImportCard> = serde_json::from_str(raw).context("parsing card file")?;
    for (i, entry) in entries.iter().enumerate() {
        ensure!(
            !entry.front.trim().is_empty() && !entry.back.trim().is_empty(),
            "card {} has an empty front or back",
            i + 1
        );
    }
    Ok(entries.into_iter().map(|e| e.into_card(now)).collect())
}
