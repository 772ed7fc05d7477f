use crate::UserId;
use crate::cards::CardId;
use crate::session::Session;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Farmer,
    Landlord,
}

/// One chair at a table. Everything mutable here is only touched while
/// the table's write lock is held.
#[derive(Debug)]
pub struct Seat {
    pub session: Arc<Session>,
    pub role: Role,
    pub hand: Vec<CardId>,
    pub ready: bool,
    pub has_bid: bool,
}

impl Seat {
    pub fn take(session: Arc<Session>) -> Seat {
        Seat {
            session,
            role: Role::Farmer,
            hand: Vec::with_capacity(crate::CARDS_PER_SEAT + crate::KITTY_CARDS),
            ready: false,
            has_bid: false,
        }
    }

    /// back to a pre-deal chair for the next hand
    pub fn reset(&mut self) {
        self.role = Role::Farmer;
        self.hand.clear();
        self.ready = false;
        self.has_bid = false;
    }

    pub fn user_id(&self) -> UserId {
        self.session.id
    }

    pub fn send(&self, frame: &Value) {
        self.session.outbox.send(frame.clone());
    }

    /// whether this hand owns every one of the given ids, no id twice
    pub fn holds(&self, cards: &[CardId]) -> bool {
        let mut seen = Vec::with_capacity(cards.len());
        cards.iter().all(|id| {
            let fresh = self.hand.contains(id) && !seen.contains(id);
            seen.push(*id);
            fresh
        })
    }

    pub fn discard(&mut self, cards: &[CardId]) {
        self.hand.retain(|id| !cards.contains(id));
    }
}
