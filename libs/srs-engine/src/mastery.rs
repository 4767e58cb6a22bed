//! Per-subject and per-module mastery aggregation.

use crate::types::Card;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group key used for cards without a value for the grouping field.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Grouping key for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Subject,
    Module,
}

impl GroupBy {
    fn key<'a>(&self, card: &'a Card) -> &'a str {
        let value = match self {
            Self::Subject => card.subject.as_deref(),
            Self::Module => card.module.as_deref(),
        };
        value.unwrap_or(UNCATEGORIZED)
    }
}

/// Progress figures for one group of cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMastery {
    pub total_cards: usize,
    /// Cards reviewed at least once.
    pub studied_cards: usize,
    pub new_cards: usize,
    pub mastery_percent: u8,
    pub due_count: usize,
    pub average_ease: f64,
    pub accuracy_percent: u8,
}

#[derive(Default)]
struct Tally {
    total: usize,
    studied: usize,
    due: usize,
    ease_sum: f64,
    reviews: u64,
    correct: u64,
}

impl Tally {
    fn add(&mut self, card: &Card, now: DateTime<Utc>) {
        self.total += 1;
        if !card.is_new() {
            self.studied += 1;
        }
        if card.is_due(now) {
            self.due += 1;
        }
        self.ease_sum += card.ease_factor;
        self.reviews += u64::from(card.review_count);
        self.correct += u64::from(card.correct_count);
    }

    fn finish(self) -> GroupMastery {
        GroupMastery {
            total_cards: self.total,
            studied_cards: self.studied,
            new_cards: self.total - self.studied,
            mastery_percent: percent(self.studied as f64, self.total as f64),
            due_count: self.due,
            average_ease: if self.total == 0 {
                0.0
            } else {
                self.ease_sum / self.total as f64
            },
            accuracy_percent: percent(self.correct as f64, self.reviews as f64),
        }
    }
}

/// Rounded percentage, 0 for an empty denominator.
fn percent(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 {
        0
    } else {
        (100.0 * part / whole).round().clamp(0.0, 100.0) as u8
    }
}

/// Fold cards into per-group mastery figures, evaluated at `now`.
pub fn aggregate(cards: &[Card], group_by: GroupBy, now: DateTime<Utc>) -> BTreeMap<String, GroupMastery> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for card in cards {
        tallies.entry(group_by.key(card)).or_default().add(card, now);
    }
    tallies
        .into_iter()
        .map(|(key, tally)| (key.to_string(), tally.finish()))
        .collect()
}
