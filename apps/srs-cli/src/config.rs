//! Database location resolution.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name of the card database inside the data directory.
const DATABASE_FILE: &str = "cards.db";

/// Resolve the database path: explicit flag or `SRS_DATABASE_PATH` (both
/// handled by clap), otherwise the platform data directory.
pub fn database_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => default_database_path(dirs::data_dir().as_deref())
            .context("could not determine a data directory; pass --db or set SRS_DATABASE_PATH")?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(path)
}

fn default_database_path(data_dir: Option<&Path>) -> Option<PathBuf> {
    data_dir.map(|dir| dir.join("srs").join(DATABASE_FILE))
}
