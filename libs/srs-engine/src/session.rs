//! Study session controller.
//!
//! A session walks a queue fixed at start time. Grading is the only transition
//! with side effects: it schedules the current card and saves it through the
//! card store. Navigation and cancellation only touch session bookkeeping.

use crate::error::{Result, SessionError};
use crate::scheduler::Sm2;
use crate::store::CardStore;
use crate::types::{Card, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Active,
    Finished,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running statistics for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub total_elapsed_seconds: i64,
}

/// Terminal summary of a finished session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of graded answers.
    pub cards_studied: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub total_time_seconds: i64,
    pub best_streak: u32,
    pub cancelled: bool,
}

impl SessionSummary {
    /// Percentage of graded answers that were correct, 0 when nothing was graded.
    pub fn accuracy(&self) -> f64 {
        if self.cards_studied == 0 {
            0.0
        } else {
            100.0 * f64::from(self.correct_answers) / f64::from(self.cards_studied)
        }
    }
}

/// What a single `grade` call did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub card_id: Uuid,
    pub correct: bool,
    pub interval_before: u32,
    pub interval_after: u32,
    pub ease_before: f64,
    pub ease_after: f64,
    pub next_review: DateTime<Utc>,
    /// The grade consumed the last card and finished the session.
    pub finished: bool,
}

/// One bounded pass over a pre-selected list of cards.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    queue: Vec<Card>,
    position: usize,
    stats: SessionStats,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    cancelled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an idle session with no queue.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            queue: Vec::new(),
            position: 0,
            stats: SessionStats::default(),
            start_time: None,
            end_time: None,
            cancelled: false,
        }
    }

    /// Create and start a session in one step.
    pub fn start_with(queue: Vec<Card>, now: DateTime<Utc>) -> Self {
        let mut session = Self::new();
        session.activate(queue, now);
        session
    }

    /// Idle -> Active. An empty queue finishes immediately with a zero summary.
    pub fn start(&mut self, queue: Vec<Card>, now: DateTime<Utc>) -> Result<()> {
        if self.state != SessionState::Idle {
            tracing::warn!(session_id = %self.id, state = %self.state, "rejected start");
            return Err(SessionError::AlreadyStarted);
        }
        self.activate(queue, now);
        Ok(())
    }

    fn activate(&mut self, queue: Vec<Card>, now: DateTime<Utc>) {
        self.queue = queue;
        self.position = 0;
        self.stats = SessionStats::default();
        self.start_time = Some(now);
        self.end_time = None;
        self.cancelled = false;

        if self.queue.is_empty() {
            tracing::info!(session_id = %self.id, "empty queue, session finished on start");
            self.state = SessionState::Finished;
            self.end_time = Some(now);
        } else {
            tracing::info!(session_id = %self.id, cards = self.queue.len(), "session started");
            self.state = SessionState::Active;
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn queue(&self) -> &[Card] {
        &self.queue
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// The card under the position pointer while the session is active.
    pub fn current(&self) -> Option<&Card> {
        match self.state {
            SessionState::Active => self.queue.get(self.position),
            _ => None,
        }
    }

    fn ensure_active(&self, action: &'static str) -> Result<()> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            tracing::warn!(session_id = %self.id, state = %self.state, action, "rejected transition");
            Err(SessionError::NotActive {
                action,
                state: self.state,
            })
        }
    }

    /// Grade the current card, save it, and advance.
    ///
    /// Grading the last card in the queue finishes the session. If scheduling
    /// or saving fails the session is left exactly as it was.
    pub fn grade<S: CardStore>(
        &mut self,
        scheduler: &Sm2,
        store: &mut S,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<GradeReport> {
        self.ensure_active("grade")?;

        let card = &self.queue[self.position];
        let updated = scheduler.review(card, outcome, now)?;
        store
            .save(&updated)
            .map_err(|e| SessionError::Store(Box::new(e)))?;

        let mut report = GradeReport {
            card_id: updated.id,
            correct: outcome.correct,
            interval_before: card.interval,
            interval_after: updated.interval,
            ease_before: card.ease_factor,
            ease_after: updated.ease_factor,
            next_review: updated.next_review,
            finished: false,
        };
        self.queue[self.position] = updated;

        if outcome.correct {
            self.stats.correct += 1;
            self.stats.streak += 1;
            self.stats.best_streak = self.stats.best_streak.max(self.stats.streak);
        } else {
            self.stats.incorrect += 1;
            self.stats.streak = 0;
        }
        self.stats.total_elapsed_seconds = self.elapsed_seconds(now);

        if self.position + 1 < self.queue.len() {
            self.position += 1;
        } else {
            self.finish(now, false);
            report.finished = true;
        }

        tracing::debug!(
            session_id = %self.id,
            card_id = %report.card_id,
            correct = report.correct,
            position = self.position,
            "graded card"
        );
        Ok(report)
    }

    /// Move the position pointer by `delta`, clamped to the queue bounds.
    /// Does not grade. Returns the new position.
    pub fn navigate(&mut self, delta: isize) -> Result<usize> {
        self.ensure_active("navigate")?;

        let last = self.queue.len() - 1;
        self.position = self.position.saturating_add_signed(delta).min(last);
        tracing::debug!(session_id = %self.id, delta, position = self.position, "navigated");
        Ok(self.position)
    }

    /// End the session early. Already graded cards keep their saved updates.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<SessionSummary> {
        self.ensure_active("cancel")?;
        self.finish(now, true);
        self.summary()
    }

    /// Summary of a finished session.
    pub fn summary(&self) -> Result<SessionSummary> {
        if self.state != SessionState::Finished {
            return Err(SessionError::NotFinished);
        }
        Ok(SessionSummary {
            cards_studied: self.stats.correct + self.stats.incorrect,
            correct_answers: self.stats.correct,
            incorrect_answers: self.stats.incorrect,
            total_time_seconds: self.stats.total_elapsed_seconds,
            best_streak: self.stats.best_streak,
            cancelled: self.cancelled,
        })
    }

    fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.start_time
            .map(|start| (now - start).num_seconds().max(0))
            .unwrap_or(0)
    }

    fn finish(&mut self, now: DateTime<Utc>, cancelled: bool) {
        self.state = SessionState::Finished;
        self.end_time = Some(now);
        self.cancelled = cancelled;
        self.stats.total_elapsed_seconds = self.elapsed_seconds(now);
        tracing::info!(
            session_id = %self.id,
            correct = self.stats.correct,
            incorrect = self.stats.incorrect,
            best_streak = self.stats.best_streak,
            cancelled,
            "session finished"
        );
    }
}
