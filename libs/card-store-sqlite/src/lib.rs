//! SQLite card store for the scheduling engine.
//!
//! Implements [`srs_engine::CardStore`] over a local database file and keeps
//! global and per-subject settings alongside the cards.

mod encode;
pub mod error;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{SettingsRepository, SqliteCardStore};
