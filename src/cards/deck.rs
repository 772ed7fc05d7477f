use super::CardId;
use crate::DECK_SIZE;
use rand::seq::SliceRandom;

/// A full 54-card deck, shuffled at construction.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    pub fn shuffled() -> Deck {
        let mut cards = (0..DECK_SIZE as CardId).collect::<Vec<CardId>>();
        cards.shuffle(&mut rand::rng());
        Deck { cards }
    }

    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// whatever was not dealt, i.e. the kitty
    pub fn rest(self) -> Vec<CardId> {
        self.cards
    }
}
