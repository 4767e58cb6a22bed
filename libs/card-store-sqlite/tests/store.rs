//! Integration tests for `SqliteCardStore`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use card_store_sqlite::{SettingsRepository, SqliteCardStore, StoreError};
use pretty_assertions::assert_eq;
use srs_engine::{
    CapOverride, CardStore, Card, Difficulty, GlobalSettings, Outcome, SelectionFilter, Session,
    SessionState, Sm2, SubjectSettings,
};
use uuid::Uuid;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn store() -> SqliteCardStore {
    SqliteCardStore::open_in_memory().expect("in-memory store")
}

fn full_card() -> Card {
    Card {
        review_count: 7,
        correct_count: 5,
        interval: 42,
        ease_factor: 2.3700000000000006,
        streak: 3,
        last_reviewed: Some(t0() + Duration::milliseconds(1_234)),
        next_review: t0() + Duration::days(42) + Duration::microseconds(5),
        ..Card::new("What is ATP?", "Energy currency", t0())
            .with_subject("biology")
            .with_module("metabolism")
            .with_difficulty(Difficulty::Hard)
            .with_tags(["cell", "energy"])
    }
}

#[test]
fn save_and_load_round_trips_every_field() {
    let mut s = store();
    let card = full_card();
    s.save(&card).unwrap();

    let loaded = s.get_card(card.id).unwrap().unwrap();
    assert_eq!(loaded, card);
}

#[test]
fn new_card_round_trips_without_optional_fields() {
    let mut s = store();
    let card = Card::new("q", "a", t0());
    s.save(&card).unwrap();
    assert_eq!(s.load(&[card.id]).unwrap(), vec![card]);
}

#[test]
fn save_is_last_write_wins_and_keeps_insertion_order() {
    let mut s = store();
    let a = Card::new("a", "1", t0());
    let b = Card::new("b", "2", t0());
    s.save_many(&[a.clone(), b.clone()]).unwrap();

    let updated = Card {
        review_count: 1,
        correct_count: 1,
        ..a.clone()
    };
    s.save(&updated).unwrap();

    let all = s.load_all().unwrap();
    assert_eq!(s.count().unwrap(), 2);
    assert_eq!(all[0], updated);
    assert_eq!(all[1], b);
}

#[test]
fn load_skips_unknown_ids() {
    let mut s = store();
    let a = Card::new("a", "1", t0());
    s.save(&a).unwrap();
    let loaded = s.load(&[Uuid::new_v4(), a.id]).unwrap();
    assert_eq!(loaded, vec![a]);
}

#[test]
fn delete_removes_card_and_reports_missing() {
    let mut s = store();
    let a = Card::new("a", "1", t0());
    s.save(&a).unwrap();

    s.delete_card(a.id).unwrap();
    assert!(s.get_card(a.id).unwrap().is_none());
    assert!(matches!(s.delete_card(a.id), Err(StoreError::CardNotFound(id)) if id == a.id));
}

#[test]
fn data_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.db");
    let card = full_card();
    {
        let mut s = SqliteCardStore::open(&path).unwrap();
        s.save(&card).unwrap();
        s.save_global_settings(&GlobalSettings {
            maximum_interval_days: Some(365),
            ..GlobalSettings::default()
        })
        .unwrap();
    }
    let s = SqliteCardStore::open(&path).unwrap();
    assert_eq!(s.load_all().unwrap(), vec![card]);
    assert_eq!(s.get_global_settings().unwrap().maximum_interval_days, Some(365));
}

#[test]
fn settings_default_then_merge_subject_overrides() {
    let s = store();
    assert_eq!(s.get_global_settings().unwrap(), GlobalSettings::default());

    let overrides = SubjectSettings {
        new_cards_per_session: Some(3),
        ..SubjectSettings::new("biology")
    };
    s.save_subject_settings(&overrides).unwrap();
    assert_eq!(s.list_subject_settings().unwrap(), vec![overrides.clone()]);

    let effective = s.get_effective_settings(Some("biology")).unwrap();
    assert_eq!(effective.new_cards_per_session, 3);
    assert_eq!(effective.reviews_per_session, 200);

    let other = s.get_effective_settings(Some("chemistry")).unwrap();
    assert_eq!(other.new_cards_per_session, 20);

    s.delete_subject_settings("biology").unwrap();
    assert!(s.get_subject_settings("biology").unwrap().is_none());
}

#[test]
fn subject_cap_override_is_stored_in_all_three_states() {
    let s = store();
    s.save_global_settings(&GlobalSettings {
        maximum_interval_days: Some(365),
        ..GlobalSettings::default()
    })
    .unwrap();

    for (cap, expected) in [
        (CapOverride::Inherit, Some(365)),
        (CapOverride::Uncapped, None),
        (CapOverride::Days(30), Some(30)),
    ] {
        let bio = SubjectSettings {
            maximum_interval: cap,
            ..SubjectSettings::new("bio")
        };
        s.save_subject_settings(&bio).unwrap();
        assert_eq!(s.get_subject_settings("bio").unwrap(), Some(bio));
        assert_eq!(
            s.get_effective_settings(Some("bio")).unwrap().maximum_interval_days,
            expected
        );
    }
}

#[test]
fn session_grades_persist_through_sqlite() {
    let mut s = store();
    let deck = vec![
        Card::new("c1", "x", t0()).with_subject("math"),
        Card::new("c2", "x", t0()).with_subject("math"),
        Card::new("c3", "x", t0()).with_subject("history"),
    ];
    s.save_many(&deck).unwrap();

    let all = s.load_all().unwrap();
    let queue = srs_engine::select_queue(&all, t0(), &SelectionFilter::default().subject("math"));
    assert_eq!(queue.len(), 2);

    let sm2 = Sm2::default();
    let mut session = Session::start_with(queue, t0());
    session.grade(&sm2, &mut s, Outcome::CORRECT, t0()).unwrap();
    session.grade(&sm2, &mut s, Outcome::INCORRECT, t0()).unwrap();
    assert_eq!(session.state(), SessionState::Finished);

    let c1 = s.get_card(deck[0].id).unwrap().unwrap();
    assert_eq!((c1.review_count, c1.correct_count, c1.streak), (1, 1, 1));
    assert_eq!(c1.next_review, t0() + Duration::days(1));

    let c2 = s.get_card(deck[1].id).unwrap().unwrap();
    assert_eq!((c2.review_count, c2.correct_count, c2.streak), (1, 0, 0));

    let c3 = s.get_card(deck[2].id).unwrap().unwrap();
    assert_eq!(c3, deck[2]);
}
