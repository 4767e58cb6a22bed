//! Mastery reporting.

use anyhow::Result;
use card_store_sqlite::SqliteCardStore;
use chrono::{DateTime, Utc};
use srs_engine::{aggregate, CardStore, GroupBy};
use std::io::Write;

pub fn mastery(
    store: &SqliteCardStore,
    group_by: GroupBy,
    json: bool,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let cards = store.load_all()?;
    let groups = aggregate(&cards, group_by, now);

    if json {
        serde_json::to_writer_pretty(&mut *out, &groups)?;
        writeln!(out)?;
        return Ok(());
    }
    if groups.is_empty() {
        writeln!(out, "No cards yet.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<20} {:>6} {:>8} {:>8} {:>5} {:>9}",
        "group", "cards", "studied", "mastery", "due", "accuracy"
    )?;
    for (key, g) in &groups {
        writeln!(
            out,
            "{:<20} {:>6} {:>8} {:>7}% {:>5} {:>8}%",
            key, g.total_cards, g.studied_cards, g.mastery_percent, g.due_count, g.accuracy_percent
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use srs_engine::Card;

    #[test]
    fn prints_one_row_per_group() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut store = SqliteCardStore::open_in_memory().unwrap();
        store
            .save_many(&[
                Card::new("a", "1", now).with_subject("math"),
                Card::new("b", "2", now).with_subject("history"),
                Card::new("c", "3", now),
            ])
            .unwrap();

        let mut out = Vec::new();
        mastery(&store, GroupBy::Subject, false, now, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("history"));
        assert!(rows[2].starts_with("uncategorized"));
    }

    #[test]
    fn json_output_is_keyed_by_group() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut store = SqliteCardStore::open_in_memory().unwrap();
        store.save(&Card::new("a", "1", now).with_module("m1")).unwrap();

        let mut out = Vec::new();
        mastery(&store, GroupBy::Module, true, now, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["m1"]["total_cards"], 1);
        assert_eq!(value["m1"]["due_count"], 1);
    }
}
