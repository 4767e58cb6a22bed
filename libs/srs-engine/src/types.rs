//! Core types for the scheduling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ease factor assigned to a freshly created card.
pub const DEFAULT_EASE: f64 = 2.5;

/// Lowest ease factor a card may ever carry.
pub const MINIMUM_EASE: f64 = 1.3;

/// Informational difficulty tag. Only used for selection, never by the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// A single question/answer unit under spaced-repetition management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    /// `None` until the card has been reviewed once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub correct_count: u32,
    /// Current review interval in whole days.
    pub interval: u32,
    pub ease_factor: f64,
    pub next_review: DateTime<Utc>,
    pub streak: u32,
}

impl Card {
    /// Create a never-reviewed card that is due immediately.
    pub fn new(front: impl Into<String>, back: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            subject: None,
            module: None,
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            created_at: now,
            last_reviewed: None,
            review_count: 0,
            correct_count: 0,
            interval: 1,
            ease_factor: DEFAULT_EASE,
            next_review: now,
            streak: 0,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Never reviewed. New cards are always eligible for study.
    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// New, or scheduled at or before `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_new() || now >= self.next_review
    }

    /// Fraction of reviews graded correct, `None` if never reviewed.
    pub fn accuracy(&self) -> Option<f64> {
        if self.review_count == 0 {
            None
        } else {
            Some(f64::from(self.correct_count) / f64::from(self.review_count))
        }
    }
}

/// Outcome of a single graded review.
///
/// Grading is binary. Richer scales are mapped onto it at the boundary with
/// [`Outcome::from_rating`] or [`Outcome::from_quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub correct: bool,
}

impl Outcome {
    pub const CORRECT: Self = Self { correct: true };
    pub const INCORRECT: Self = Self { correct: false };

    pub fn new(correct: bool) -> Self {
        Self { correct }
    }

    /// Again counts as a miss, every other rating as a pass.
    pub fn from_rating(rating: Rating) -> Self {
        Self::new(rating != Rating::Again)
    }

    /// Map an SM-2 quality score (0-5). Three or above is a pass.
    pub fn from_quality(quality: u8) -> Option<Self> {
        match quality {
            0..=2 => Some(Self::INCORRECT),
            3..=5 => Some(Self::CORRECT),
            _ => None,
        }
    }
}

impl From<bool> for Outcome {
    fn from(correct: bool) -> Self {
        Self::new(correct)
    }
}

/// Four-point rating as shown by review UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }
}
