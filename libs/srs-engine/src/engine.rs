//! Caller-owned entry point tying the scheduler to engine settings.

use crate::error::{Result, ValidationError};
use crate::mastery::{aggregate, GroupBy, GroupMastery};
use crate::scheduler::Sm2;
use crate::selector::{select_queue, SelectionFilter, SelectionMode};
use crate::session::{GradeReport, Session};
use crate::settings::EffectiveSettings;
use crate::store::CardStore;
use crate::types::{Card, Outcome};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Scheduling engine. Holds configuration only, never card state.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: EffectiveSettings,
    scheduler: Sm2,
}

impl Engine {
    pub fn new(settings: EffectiveSettings) -> Self {
        Self {
            scheduler: Sm2::from_settings(&settings),
            settings,
        }
    }

    pub fn settings(&self) -> &EffectiveSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Sm2 {
        &self.scheduler
    }

    pub fn review_card(
        &self,
        card: &Card,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> std::result::Result<Card, ValidationError> {
        self.scheduler.review(card, outcome, now)
    }

    /// Select a queue.
    ///
    /// `Review` and `NewOnly` queues get the engine's per-session limits unless
    /// the filter sets its own. `All` and `DifficultOnly` return every match.
    pub fn select_queue(
        &self,
        cards: &[Card],
        now: DateTime<Utc>,
        filter: &SelectionFilter,
    ) -> Vec<Card> {
        if !matches!(filter.mode, SelectionMode::Review | SelectionMode::NewOnly) {
            return select_queue(cards, now, filter);
        }
        let mut filter = filter.clone();
        filter.new_limit = filter
            .new_limit
            .or(Some(self.settings.new_cards_per_session as usize));
        filter.review_limit = filter
            .review_limit
            .or(Some(self.settings.reviews_per_session as usize));
        select_queue(cards, now, &filter)
    }

    pub fn start_session(&self, queue: Vec<Card>, now: DateTime<Utc>) -> Session {
        Session::start_with(queue, now)
    }

    pub fn grade<S: CardStore>(
        &self,
        session: &mut Session,
        store: &mut S,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<GradeReport> {
        session.grade(&self.scheduler, store, outcome, now)
    }

    pub fn aggregate(
        &self,
        cards: &[Card],
        group_by: GroupBy,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, GroupMastery> {
        aggregate(cards, group_by, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionState, SessionSummary};
    use crate::types::Difficulty;
    use crate::store::MemoryCardStore;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn correct_correct_incorrect_sequence_through_engine() {
        let engine = Engine::default();
        let card = Card::new("q", "a", t0());

        let a = engine.review_card(&card, Outcome::CORRECT, t0()).unwrap();
        assert_eq!((a.interval, a.review_count, a.streak), (1, 1, 1));
        assert_eq!(a.next_review, t0() + Duration::days(1));
        assert!((a.ease_factor - 2.5).abs() < 1e-9);

        let b = engine
            .review_card(&a, Outcome::CORRECT, t0() + Duration::days(1))
            .unwrap();
        assert_eq!((b.interval, b.review_count, b.streak), (6, 2, 2));
        assert_eq!(b.next_review, t0() + Duration::days(7));
        assert!((b.ease_factor - 2.6).abs() < 1e-9);

        let c = engine.review_card(&b, Outcome::INCORRECT, t0()).unwrap();
        assert_eq!((c.interval, c.review_count, c.streak), (1, 3, 0));
        assert!((c.ease_factor - 2.4).abs() < 1e-9);
    }

    #[test]
    fn full_study_pass_updates_store_and_mastery() {
        let engine = Engine::default();
        let deck = vec![
            Card::new("c1", "x", t0()).with_subject("math"),
            Card::new("c2", "x", t0()).with_subject("math"),
        ];
        let mut store = MemoryCardStore::with_cards(deck.clone());

        let queue = engine.select_queue(&deck, t0(), &SelectionFilter::default());
        let mut session = engine.start_session(queue, t0());
        engine
            .grade(&mut session, &mut store, Outcome::CORRECT, t0())
            .unwrap();
        engine
            .grade(&mut session, &mut store, Outcome::INCORRECT, t0())
            .unwrap();

        assert_eq!(session.state(), SessionState::Finished);
        let summary = session.summary().unwrap();
        assert_eq!(
            summary,
            SessionSummary {
                cards_studied: 2,
                correct_answers: 1,
                incorrect_answers: 1,
                best_streak: 1,
                ..SessionSummary::default()
            }
        );

        let cards = store.load_all().unwrap();
        let mastery = engine.aggregate(&cards, GroupBy::Subject, t0());
        let math = &mastery["math"];
        assert_eq!(math.mastery_percent, 100);
        assert_eq!(math.due_count, 0);
    }

    #[test]
    fn engine_limits_apply_unless_filter_overrides() {
        let engine = Engine::new(EffectiveSettings {
            new_cards_per_session: 1,
            ..EffectiveSettings::default()
        });
        let deck: Vec<Card> = (0..3).map(|i| Card::new(format!("n{i}"), "x", t0())).collect();

        let filter = SelectionFilter::new(SelectionMode::NewOnly);
        assert_eq!(engine.select_queue(&deck, t0(), &filter).len(), 1);

        let filter = SelectionFilter {
            new_limit: Some(5),
            ..filter
        };
        assert_eq!(engine.select_queue(&deck, t0(), &filter).len(), 3);
    }

    #[test]
    fn all_and_difficult_modes_ignore_session_limits() {
        let engine = Engine::new(EffectiveSettings {
            new_cards_per_session: 2,
            ..EffectiveSettings::default()
        });
        let deck: Vec<Card> = (0..5)
            .map(|i| Card::new(format!("n{i}"), "x", t0()).with_difficulty(Difficulty::Hard))
            .collect();

        let all = engine.select_queue(&deck, t0(), &SelectionFilter::new(SelectionMode::All));
        assert_eq!(all.len(), 5);
        let difficult = SelectionFilter::new(SelectionMode::DifficultOnly);
        assert_eq!(engine.select_queue(&deck, t0(), &difficult).len(), 5);
        assert_eq!(engine.select_queue(&deck, t0(), &SelectionFilter::default()).len(), 2);

        let capped = SelectionFilter {
            new_limit: Some(3),
            ..SelectionFilter::new(SelectionMode::All)
        };
        assert_eq!(engine.select_queue(&deck, t0(), &capped).len(), 3);
    }

    #[test]
    fn engine_scheduler_honors_configured_cap() {
        let engine = Engine::new(EffectiveSettings {
            maximum_interval_days: Some(10),
            ..EffectiveSettings::default()
        });
        assert_eq!(engine.scheduler().maximum_interval, Some(10));
    }
}
