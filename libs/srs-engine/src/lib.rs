//! Spaced-repetition scheduling engine.
//!
//! Provides:
//! - SM-2 derived scheduler with binary grading
//! - Due-set selection for study queues
//! - Session controller driving a single study or quiz pass
//! - Per-subject and per-module mastery aggregation
//! - The `CardStore` collaborator trait and an in-memory store
//!
//! Every time-dependent call takes `now` explicitly; nothing reads the system clock.

pub mod engine;
pub mod error;
pub mod mastery;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod settings;
pub mod store;
pub mod types;

pub use engine::Engine;
pub use error::{Result, SessionError, ValidationError};
pub use mastery::{aggregate, GroupBy, GroupMastery, UNCATEGORIZED};
pub use scheduler::Sm2;
pub use selector::{select_queue, SelectionFilter, SelectionMode};
pub use session::{GradeReport, Session, SessionState, SessionStats, SessionSummary};
pub use settings::{CapOverride, EffectiveSettings, GlobalSettings, SubjectSettings};
pub use store::{CardStore, MemoryCardStore};
pub use types::{Card, Difficulty, Outcome, Rating, DEFAULT_EASE, MINIMUM_EASE};
