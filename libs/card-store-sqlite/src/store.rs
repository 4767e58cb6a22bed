//! SQLite-backed card store and settings repository.

use crate::encode::{
    decode_cap, decode_difficulty, decode_dt, decode_tags, encode_cap, encode_dt, encode_tags,
};
use crate::error::{Result, StoreError};
use crate::schema;
use rusqlite::{params, Connection, OptionalExtension};
use srs_engine::{Card, CardStore, EffectiveSettings, GlobalSettings, SubjectSettings};
use std::path::Path;
use uuid::Uuid;

const CARD_COLUMNS: &str = "id, front, back, subject, module, tags, difficulty, created_at, \
     last_reviewed, review_count, correct_count, interval_days, ease_factor, next_review, streak";

const UPSERT_CARD: &str = "INSERT INTO cards (id, front, back, subject, module, tags, difficulty, \
     created_at, last_reviewed, review_count, correct_count, interval_days, ease_factor, next_review, streak)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
     ON CONFLICT(id) DO UPDATE SET
        front = excluded.front,
        back = excluded.back,
        subject = excluded.subject,
        module = excluded.module,
        tags = excluded.tags,
        difficulty = excluded.difficulty,
        created_at = excluded.created_at,
        last_reviewed = excluded.last_reviewed,
        review_count = excluded.review_count,
        correct_count = excluded.correct_count,
        interval_days = excluded.interval_days,
        ease_factor = excluded.ease_factor,
        next_review = excluded.next_review,
        streak = excluded.streak";

/// Repository for settings operations.
pub trait SettingsRepository {
    fn get_global_settings(&self) -> Result<GlobalSettings>;
    fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()>;
    fn get_subject_settings(&self, subject: &str) -> Result<Option<SubjectSettings>>;
    fn list_subject_settings(&self) -> Result<Vec<SubjectSettings>>;
    fn save_subject_settings(&self, settings: &SubjectSettings) -> Result<()>;
    fn delete_subject_settings(&self, subject: &str) -> Result<()>;
    fn get_effective_settings(&self, subject: Option<&str>) -> Result<EffectiveSettings>;
}

/// Raw column values for one card row, decoded outside the rusqlite closure.
struct CardRow {
    id: String,
    front: String,
    back: String,
    subject: Option<String>,
    module: Option<String>,
    tags: String,
    difficulty: String,
    created_at: i64,
    last_reviewed: Option<i64>,
    review_count: u32,
    correct_count: u32,
    interval: u32,
    ease_factor: f64,
    next_review: i64,
    streak: u32,
}

impl CardRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            subject: row.get(3)?,
            module: row.get(4)?,
            tags: row.get(5)?,
            difficulty: row.get(6)?,
            created_at: row.get(7)?,
            last_reviewed: row.get(8)?,
            review_count: row.get(9)?,
            correct_count: row.get(10)?,
            interval: row.get(11)?,
            ease_factor: row.get(12)?,
            next_review: row.get(13)?,
            streak: row.get(14)?,
        })
    }

    fn into_card(self) -> Result<Card> {
        Ok(Card {
            id: Uuid::parse_str(&self.id)?,
            front: self.front,
            back: self.back,
            subject: self.subject,
            module: self.module,
            tags: decode_tags(&self.tags)?,
            difficulty: decode_difficulty(&self.difficulty)?,
            created_at: decode_dt(self.created_at)?,
            last_reviewed: self.last_reviewed.map(decode_dt).transpose()?,
            review_count: self.review_count,
            correct_count: self.correct_count,
            interval: self.interval,
            ease_factor: self.ease_factor,
            next_review: decode_dt(self.next_review)?,
            streak: self.streak,
        })
    }
}

/// SQLite implementation of the card store.
pub struct SqliteCardStore {
    conn: Connection,
}

impl SqliteCardStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened card database");
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        self.conn.execute_batch(schema::INIT_GLOBAL_SETTINGS)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    pub fn get_card(&self, id: Uuid) -> Result<Option<Card>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id.to_string()],
                CardRow::from_row,
            )
            .optional()?;
        row.map(CardRow::into_card).transpose()
    }

    pub fn count(&self) -> Result<u32> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?)
    }

    /// Remove a card permanently.
    pub fn delete_card(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::CardNotFound(id));
        }
        tracing::debug!(card_id = %id, "deleted card");
        Ok(())
    }

    fn upsert(conn: &Connection, card: &Card) -> Result<()> {
        conn.execute(
            UPSERT_CARD,
            params![
                card.id.to_string(),
                card.front,
                card.back,
                card.subject,
                card.module,
                encode_tags(&card.tags)?,
                card.difficulty.as_str(),
                encode_dt(card.created_at),
                card.last_reviewed.map(encode_dt),
                card.review_count,
                card.correct_count,
                card.interval,
                card.ease_factor,
                encode_dt(card.next_review),
                card.streak,
            ],
        )?;
        Ok(())
    }
}

impl CardStore for SqliteCardStore {
    type Error = StoreError;

    fn load(&self, ids: &[Uuid]) -> Result<Vec<Card>> {
        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(card) = self.get_card(*id)? {
                cards.push(card);
            }
        }
        Ok(cards)
    }

    fn load_all(&self) -> Result<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY seq"))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }

    fn save(&mut self, card: &Card) -> Result<()> {
        Self::upsert(&self.conn, card)?;
        tracing::debug!(card_id = %card.id, "saved card");
        Ok(())
    }

    /// All-or-nothing bulk save.
    fn save_many(&mut self, cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for card in cards {
            Self::upsert(&tx, card)?;
        }
        tx.commit()?;
        tracing::debug!(count = cards.len(), "saved cards");
        Ok(())
    }
}

impl SettingsRepository for SqliteCardStore {
    fn get_global_settings(&self) -> Result<GlobalSettings> {
        self.conn
            .query_row(
                "SELECT maximum_interval_days, new_cards_per_session, reviews_per_session FROM global_settings WHERE id = 1",
                [],
                |row| {
                    Ok(GlobalSettings {
                        maximum_interval_days: row.get(0)?,
                        new_cards_per_session: row.get(1)?,
                        reviews_per_session: row.get(2)?,
                    })
                },
            )
            .map_err(Into::into)
    }

    fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()> {
        self.conn.execute(
            "UPDATE global_settings SET maximum_interval_days = ?1, new_cards_per_session = ?2, reviews_per_session = ?3 WHERE id = 1",
            params![
                settings.maximum_interval_days,
                settings.new_cards_per_session,
                settings.reviews_per_session,
            ],
        )?;
        Ok(())
    }

    fn get_subject_settings(&self, subject: &str) -> Result<Option<SubjectSettings>> {
        self.conn
            .query_row(
                "SELECT subject, maximum_interval_days, interval_uncapped, new_cards_per_session, reviews_per_session FROM subject_settings WHERE subject = ?1",
                params![subject],
                Self::row_to_subject_settings,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_subject_settings(&self) -> Result<Vec<SubjectSettings>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject, maximum_interval_days, interval_uncapped, new_cards_per_session, reviews_per_session FROM subject_settings ORDER BY subject",
        )?;
        let settings = stmt
            .query_map([], Self::row_to_subject_settings)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(settings)
    }

    fn save_subject_settings(&self, settings: &SubjectSettings) -> Result<()> {
        let (days, uncapped) = encode_cap(settings.maximum_interval);
        self.conn.execute(
            "INSERT OR REPLACE INTO subject_settings (subject, maximum_interval_days, interval_uncapped, new_cards_per_session, reviews_per_session) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                settings.subject,
                days,
                uncapped,
                settings.new_cards_per_session,
                settings.reviews_per_session,
            ],
        )?;
        Ok(())
    }

    fn delete_subject_settings(&self, subject: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM subject_settings WHERE subject = ?1",
            params![subject],
        )?;
        Ok(())
    }

    fn get_effective_settings(&self, subject: Option<&str>) -> Result<EffectiveSettings> {
        let global = self.get_global_settings()?;
        let subject_settings = match subject {
            Some(s) => self.get_subject_settings(s)?,
            None => None,
        };
        Ok(EffectiveSettings::merge(&global, subject_settings.as_ref()))
    }
}

impl SqliteCardStore {
    fn row_to_subject_settings(row: &rusqlite::Row) -> rusqlite::Result<SubjectSettings> {
        Ok(SubjectSettings {
            subject: row.get(0)?,
            maximum_interval: decode_cap(row.get(1)?, row.get(2)?),
            new_cards_per_session: row.get(3)?,
            reviews_per_session: row.get(4)?,
        })
    }
}
