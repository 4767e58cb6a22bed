//! Error types for srs-engine.

use crate::session::SessionState;
use thiserror::Error;
use uuid::Uuid;

/// A card that breaks the data model invariants and cannot be scheduled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("card {id}: correct count {correct} exceeds review count {reviews}")]
    CorrectExceedsReviews { id: Uuid, correct: u32, reviews: u32 },

    #[error("card {id}: ease factor {ease} is below the minimum {minimum}")]
    EaseBelowMinimum { id: Uuid, ease: f64, minimum: f64 },

    #[error("card {id}: reviewed card has a zero-day interval")]
    ZeroInterval { id: Uuid },
}

/// Errors raised by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} a session that is {state}")]
    NotActive {
        action: &'static str,
        state: SessionState,
    },

    #[error("session has already been started")]
    AlreadyStarted,

    #[error("session summary requested before the session finished")]
    NotFinished,

    #[error("invalid card: {0}")]
    InvalidCard(#[from] ValidationError),

    #[error("card store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;
