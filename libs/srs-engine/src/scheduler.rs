//! SM-2 derived scheduler with binary grading.
//!
//! A correct answer grows the interval (1 day, then 6 days, then the previous
//! interval times the ease factor) and, from the second review on, raises the
//! ease factor. A miss resets the interval to one day and lowers the ease
//! factor, never below the floor.

use crate::error::ValidationError;
use crate::settings::EffectiveSettings;
use crate::types::{Card, Outcome, DEFAULT_EASE, MINIMUM_EASE};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub ease_bonus: f64,
    pub lapse_penalty: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// `None` leaves interval growth uncapped.
    pub maximum_interval: Option<u32>,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE,
            minimum_ease: MINIMUM_EASE,
            ease_bonus: 0.1,
            lapse_penalty: 0.2,
            first_interval: 1,
            second_interval: 6,
            maximum_interval: None,
        }
    }
}

impl Sm2 {
    /// Default parameters with the interval cap taken from settings.
    pub fn from_settings(settings: &EffectiveSettings) -> Self {
        Self {
            maximum_interval: settings.maximum_interval_days,
            ..Self::default()
        }
    }

    /// Check that a card satisfies the invariants the algorithm relies on.
    pub fn validate(&self, card: &Card) -> Result<(), ValidationError> {
        if card.correct_count > card.review_count {
            return Err(ValidationError::CorrectExceedsReviews {
                id: card.id,
                correct: card.correct_count,
                reviews: card.review_count,
            });
        }
        // NaN fails this comparison too.
        if !(card.ease_factor >= self.minimum_ease) || !card.ease_factor.is_finite() {
            return Err(ValidationError::EaseBelowMinimum {
                id: card.id,
                ease: card.ease_factor,
                minimum: self.minimum_ease,
            });
        }
        if card.review_count > 0 && card.interval == 0 {
            return Err(ValidationError::ZeroInterval { id: card.id });
        }
        Ok(())
    }

    /// Apply one graded review and return the updated card.
    ///
    /// The input card is left untouched. Malformed cards are rejected rather
    /// than repaired.
    pub fn review(
        &self,
        card: &Card,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<Card, ValidationError> {
        if let Err(err) = self.validate(card) {
            tracing::warn!(card_id = %card.id, error = %err, "rejecting review of malformed card");
            return Err(err);
        }

        let (interval, ease_factor, streak) = if outcome.correct {
            // The first success only introduces the card; ease starts moving on the second.
            let (interval, ease_bonus) = match card.review_count {
                0 => (self.first_interval, 0.0),
                1 => (self.second_interval, self.ease_bonus),
                _ => (grow_interval(card.interval, card.ease_factor), self.ease_bonus),
            };
            let interval = match self.maximum_interval {
                Some(cap) => interval.min(cap),
                None => interval,
            };
            (
                interval.max(1),
                card.ease_factor + ease_bonus,
                card.streak.saturating_add(1),
            )
        } else {
            (1, card.ease_factor - self.lapse_penalty, 0)
        };
        let ease_factor = ease_factor.max(self.minimum_ease);

        let next_review = now
            .checked_add_signed(Duration::days(i64::from(interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::debug!(
            card_id = %card.id,
            correct = outcome.correct,
            interval_before = card.interval,
            interval_after = interval,
            ease_before = card.ease_factor,
            ease_after = ease_factor,
            "scheduled card"
        );

        Ok(Card {
            review_count: card.review_count.saturating_add(1),
            correct_count: card.correct_count.saturating_add(u32::from(outcome.correct)),
            streak,
            interval,
            ease_factor,
            next_review,
            last_reviewed: Some(now),
            ..card.clone()
        })
    }
}

fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    // `as` saturates at u32::MAX.
    (f64::from(interval) * ease_factor).round() as u32
}
