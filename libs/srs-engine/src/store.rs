//! The `CardStore` trait and an in-memory implementation.
//!
//! The engine never owns persistence. Session grading hands each updated card
//! to a store exactly once; everything else reads snapshots.

use crate::types::Card;
use std::convert::Infallible;
use uuid::Uuid;

/// Abstraction over durable card storage.
pub trait CardStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the cards with the given ids, in the order requested.
    /// Unknown ids are skipped.
    fn load(&self, ids: &[Uuid]) -> Result<Vec<Card>, Self::Error>;

    /// Load every card in the store, in insertion order.
    fn load_all(&self) -> Result<Vec<Card>, Self::Error>;

    /// Insert or replace a card. Last write wins.
    fn save(&mut self, card: &Card) -> Result<(), Self::Error>;

    fn save_many(&mut self, cards: &[Card]) -> Result<(), Self::Error> {
        for card in cards {
            self.save(card)?;
        }
        Ok(())
    }
}

/// Card store kept entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCardStore {
    cards: Vec<Card>,
    saves: usize,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards, saves: 0 }
    }

    pub fn get(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of `save` calls made so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CardStore for MemoryCardStore {
    type Error = Infallible;

    fn load(&self, ids: &[Uuid]) -> Result<Vec<Card>, Self::Error> {
        Ok(ids.iter().filter_map(|id| self.get(*id).cloned()).collect())
    }

    fn load_all(&self) -> Result<Vec<Card>, Self::Error> {
        Ok(self.cards.clone())
    }

    fn save(&mut self, card: &Card) -> Result<(), Self::Error> {
        self.saves += 1;
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => self.cards.push(card.clone()),
        }
        Ok(())
    }
}
