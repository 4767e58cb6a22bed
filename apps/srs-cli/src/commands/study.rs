//! Queue inspection, single reviews and interactive study sessions.

use super::engine_for;
use crate::cli::ReviewArgs;
use anyhow::{Context, Result};
use card_store_sqlite::SqliteCardStore;
use chrono::{DateTime, Utc};
use srs_engine::{Card, CardStore, Engine, Outcome, SelectionFilter, Session, SessionSummary};
use std::io::{BufRead, Write};

fn due_label(card: &Card) -> String {
    if card.is_new() {
        "new".to_string()
    } else {
        format!("due {}", card.next_review.format("%Y-%m-%d %H:%M"))
    }
}

/// Build the queue for `filter` from every stored card.
fn build_queue(
    store: &SqliteCardStore,
    filter: &SelectionFilter,
    now: DateTime<Utc>,
) -> Result<(Engine, Vec<Card>)> {
    let engine = engine_for(store, filter.subject.as_deref())?;
    let cards = store.load_all()?;
    let queue = engine.select_queue(&cards, now, filter);
    Ok((engine, queue))
}

pub fn queue(
    store: &SqliteCardStore,
    filter: &SelectionFilter,
    json: bool,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let (_, queue) = build_queue(store, filter, now)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &queue)?;
        writeln!(out)?;
        return Ok(());
    }
    if queue.is_empty() {
        writeln!(out, "Nothing to study.")?;
        return Ok(());
    }
    for card in &queue {
        writeln!(out, "{}  {:<22}  {}", card.id, due_label(card), card.front)?;
    }
    writeln!(out, "{} cards", queue.len())?;
    Ok(())
}

pub fn review(
    store: &mut SqliteCardStore,
    args: &ReviewArgs,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let card = store
        .get_card(args.id)?
        .with_context(|| format!("card {} not found", args.id))?;
    let engine = engine_for(store, card.subject.as_deref())?;

    let updated = engine.review_card(&card, Outcome::new(args.correct), now)?;
    store.save(&updated)?;

    writeln!(
        out,
        "Next review in {} day(s), {}",
        updated.interval,
        updated.next_review.format("%Y-%m-%d")
    )?;
    Ok(())
}

pub fn study<R: BufRead, W: Write>(
    store: &mut SqliteCardStore,
    filter: &SelectionFilter,
    input: &mut R,
    out: &mut W,
    clock: impl Fn() -> DateTime<Utc>,
) -> Result<()> {
    let (engine, queue) = build_queue(store, filter, clock())?;
    if queue.is_empty() {
        writeln!(out, "Nothing to study.")?;
        return Ok(());
    }

    let mut session = engine.start_session(queue, clock());
    let summary = run_session(&engine, store, &mut session, input, out, clock)?;
    print_summary(&summary, out)
}

/// Read one trimmed, lowercased line. `None` on end of input.
fn read_choice(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

/// Drive `session` from line-based input until it finishes.
///
/// End of input cancels the session, keeping the grades made so far.
pub fn run_session<S: CardStore, R: BufRead, W: Write>(
    engine: &Engine,
    store: &mut S,
    session: &mut Session,
    input: &mut R,
    out: &mut W,
    clock: impl Fn() -> DateTime<Utc>,
) -> Result<SessionSummary> {
    loop {
        let Some(card) = session.current().cloned() else {
            break;
        };
        writeln!(
            out,
            "\n[{}/{}] {}",
            session.position() + 1,
            session.queue().len(),
            card.front
        )?;
        write!(out, "Press Enter to reveal (q to quit) ")?;
        out.flush()?;
        if matches!(read_choice(input)?.as_deref(), None | Some("q")) {
            session.cancel(clock())?;
            break;
        }
        writeln!(out, "  {}", card.back)?;

        loop {
            write!(out, "Correct? [y]es [n]o [p]revious [s]kip [q]uit ")?;
            out.flush()?;
            let outcome = match read_choice(input)?.as_deref() {
                Some("y") => Outcome::CORRECT,
                Some("n") => Outcome::INCORRECT,
                Some("p") => {
                    session.navigate(-1)?;
                    break;
                }
                Some("s") => {
                    session.navigate(1)?;
                    break;
                }
                None | Some("q") => {
                    session.cancel(clock())?;
                    break;
                }
                Some(_) => {
                    writeln!(out, "  please answer y, n, p, s or q")?;
                    continue;
                }
            };
            let report = engine.grade(session, store, outcome, clock())?;
            writeln!(out, "  next review in {} day(s)", report.interval_after)?;
            break;
        }
    }
    Ok(session.summary()?)
}

fn print_summary(summary: &SessionSummary, out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    if summary.cancelled {
        writeln!(out, "Session ended early.")?;
    }
    writeln!(
        out,
        "Studied {} cards: {} correct ({:.0}%), best streak {}, {}s",
        summary.cards_studied,
        summary.correct_answers,
        summary.accuracy(),
        summary.best_streak,
        summary.total_time_seconds
    )?;
    Ok(())
}
