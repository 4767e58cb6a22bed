//! Due-set selection: which cards go into a study queue, and in what order.

use crate::settings::EffectiveSettings;
use crate::types::{Card, Difficulty};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accuracy below which a reviewed card counts as difficult.
const DIFFICULT_ACCURACY: f64 = 0.5;

/// Which cards a queue draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// New cards plus cards whose review time has passed.
    Review,
    NewOnly,
    /// Cards tagged hard, or answered correctly less than half the time.
    DifficultOnly,
    All,
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Review
    }
}

/// Selection policy for [`select_queue`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub mode: SelectionMode,
    /// Case-insensitive substring matched against front, back and tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_limit: Option<usize>,
}

impl SelectionFilter {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Copy the per-session new/review limits from settings.
    pub fn with_limits(mut self, settings: &EffectiveSettings) -> Self {
        self.new_limit = Some(settings.new_cards_per_session as usize);
        self.review_limit = Some(settings.reviews_per_session as usize);
        self
    }

    fn matches_grouping(&self, card: &Card) -> bool {
        let subject_ok = match &self.subject {
            Some(s) => card.subject.as_deref() == Some(s.as_str()),
            None => true,
        };
        let module_ok = match &self.module {
            Some(m) => card.module.as_deref() == Some(m.as_str()),
            None => true,
        };
        subject_ok && module_ok
    }

    fn matches_mode(&self, card: &Card, now: DateTime<Utc>) -> bool {
        match self.mode {
            SelectionMode::Review => card.is_due(now),
            SelectionMode::NewOnly => card.is_new(),
            SelectionMode::DifficultOnly => {
                card.difficulty == Difficulty::Hard
                    || card.accuracy().is_some_and(|a| a < DIFFICULT_ACCURACY)
            }
            SelectionMode::All => true,
        }
    }
}

fn matches_search(card: &Card, needle: &str) -> bool {
    card.front.to_lowercase().contains(needle)
        || card.back.to_lowercase().contains(needle)
        || card.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Build a study queue from a snapshot of cards.
///
/// New cards come first, then the rest by ascending `next_review`. Ties keep
/// the order of `cards`, so the same input always yields the same queue.
pub fn select_queue(cards: &[Card], now: DateTime<Utc>, filter: &SelectionFilter) -> Vec<Card> {
    let needle = filter
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<&Card> = cards
        .iter()
        .filter(|c| filter.matches_grouping(c))
        .filter(|c| filter.matches_mode(c, now))
        .filter(|c| needle.as_deref().map_or(true, |n| matches_search(c, n)))
        .collect();

    // `None` sorts before any `Some`, placing new cards first. `sort_by_key` is stable.
    selected.sort_by_key(|c| if c.is_new() { None } else { Some(c.next_review) });

    let mut new_taken = 0;
    let mut review_taken = 0;
    let queue: Vec<Card> = selected
        .into_iter()
        .filter(|c| {
            let (taken, limit) = if c.is_new() {
                (&mut new_taken, filter.new_limit)
            } else {
                (&mut review_taken, filter.review_limit)
            };
            if limit.is_some_and(|l| *taken >= l) {
                return false;
            }
            *taken += 1;
            true
        })
        .cloned()
        .collect();

    tracing::debug!(
        mode = ?filter.mode,
        considered = cards.len(),
        selected = queue.len(),
        "selected study queue"
    );
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn reviewed(front: &str, due_in_days: i64) -> Card {
        Card {
            review_count: 2,
            correct_count: 2,
            interval: 6,
            next_review: t0() + Duration::days(due_in_days),
            last_reviewed: Some(t0()),
            ..Card::new(front, "back", t0())
        }
    }

    fn fronts(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.front.as_str()).collect()
    }

    #[test]
    fn new_only_returns_just_the_new_card() {
        let cards = vec![reviewed("a", -1), Card::new("b", "x", t0()), reviewed("c", 3)];
        let queue = select_queue(&cards, t0(), &SelectionFilter::new(SelectionMode::NewOnly));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, cards[1].id);
    }

    #[test]
    fn review_mode_includes_new_and_due_only() {
        let cards = vec![
            reviewed("future", 2),
            reviewed("overdue", -3),
            Card::new("new", "x", t0()),
            reviewed("due-now", 0),
        ];
        let queue = select_queue(&cards, t0(), &SelectionFilter::default());
        assert_eq!(fronts(&queue), vec!["new", "overdue", "due-now"]);
    }

    #[test]
    fn new_cards_sort_first_even_if_scheduled_late() {
        let mut late_new = Card::new("late-new", "x", t0());
        late_new.next_review = t0() + Duration::days(100);
        let cards = vec![reviewed("old", -10), late_new];
        let queue = select_queue(&cards, t0(), &SelectionFilter::new(SelectionMode::All));
        assert_eq!(fronts(&queue), vec!["late-new", "old"]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let cards = vec![
            reviewed("x", -1),
            Card::new("n1", "x", t0()),
            reviewed("y", -1),
            Card::new("n2", "x", t0()),
        ];
        let queue = select_queue(&cards, t0(), &SelectionFilter::default());
        assert_eq!(fronts(&queue), vec!["n1", "n2", "x", "y"]);
    }

    #[test]
    fn repeated_selection_is_identical() {
        let cards: Vec<Card> = (0..20)
            .map(|i| {
                if i % 3 == 0 {
                    Card::new(format!("n{i}"), "x", t0())
                } else {
                    reviewed(&format!("r{i}"), (i % 5) - 2)
                }
            })
            .collect();
        let filter = SelectionFilter::new(SelectionMode::All);
        let first = select_queue(&cards, t0(), &filter);
        let second = select_queue(&cards, t0(), &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn difficult_only_uses_tag_or_accuracy() {
        let hard = Card::new("hard", "x", t0()).with_difficulty(Difficulty::Hard);
        let struggling = Card {
            review_count: 4,
            correct_count: 1,
            ..reviewed("struggling", 5)
        };
        let borderline = Card {
            review_count: 4,
            correct_count: 2,
            ..reviewed("borderline", 5)
        };
        let fresh = Card::new("fresh", "x", t0());
        let cards = vec![hard, struggling, borderline, fresh];

        let queue = select_queue(&cards, t0(), &SelectionFilter::new(SelectionMode::DifficultOnly));
        assert_eq!(fronts(&queue), vec!["hard", "struggling"]);
    }

    #[test]
    fn subject_and_module_restrict_selection() {
        let cards = vec![
            Card::new("bio-1", "x", t0()).with_subject("biology").with_module("cells"),
            Card::new("bio-2", "x", t0()).with_subject("biology").with_module("genes"),
            Card::new("chem", "x", t0()).with_subject("chemistry"),
            Card::new("loose", "x", t0()),
        ];
        let by_subject = SelectionFilter::new(SelectionMode::All).subject("biology");
        assert_eq!(fronts(&select_queue(&cards, t0(), &by_subject)), vec!["bio-1", "bio-2"]);

        let by_module = by_subject.module("genes");
        assert_eq!(fronts(&select_queue(&cards, t0(), &by_module)), vec!["bio-2"]);
    }

    #[test]
    fn search_is_case_insensitive_over_front_back_and_tags() {
        let cards = vec![
            Card::new("Mitochondria", "powerhouse", t0()),
            Card::new("Ribosome", "makes PROTEIN", t0()),
            Card::new("Nucleus", "holds DNA", t0()).with_tags(["Organelle"]),
            Card::new("Photon", "light", t0()),
        ];
        let f = |term: &str| SelectionFilter::new(SelectionMode::All).search(term);

        assert_eq!(fronts(&select_queue(&cards, t0(), &f("mito"))), vec!["Mitochondria"]);
        assert_eq!(fronts(&select_queue(&cards, t0(), &f("protein"))), vec!["Ribosome"]);
        assert_eq!(fronts(&select_queue(&cards, t0(), &f("organ"))), vec!["Nucleus"]);
        assert_eq!(select_queue(&cards, t0(), &f("   ")).len(), 4);
    }

    #[test]
    fn search_applies_after_mode() {
        let cards = vec![reviewed("alpha future", 5), Card::new("alpha new", "x", t0())];
        let filter = SelectionFilter::default().search("alpha");
        assert_eq!(fronts(&select_queue(&cards, t0(), &filter)), vec!["alpha new"]);
    }

    #[test]
    fn limits_cap_new_and_review_separately() {
        let cards = vec![
            Card::new("n1", "x", t0()),
            reviewed("r1", -3),
            Card::new("n2", "x", t0()),
            reviewed("r2", -2),
            Card::new("n3", "x", t0()),
            reviewed("r3", -1),
        ];
        let settings = EffectiveSettings {
            new_cards_per_session: 2,
            reviews_per_session: 1,
            ..EffectiveSettings::default()
        };
        let filter = SelectionFilter::default().with_limits(&settings);
        assert_eq!(fronts(&select_queue(&cards, t0(), &filter)), vec!["n1", "n2", "r1"]);
    }

    #[test]
    fn selection_does_not_touch_overdue_cards() {
        let cards = vec![reviewed("overdue", -30)];
        let queue = select_queue(&cards, t0(), &SelectionFilter::default());
        assert_eq!(queue[0].next_review, cards[0].next_review);
    }
}
