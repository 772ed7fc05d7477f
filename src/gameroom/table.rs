use super::Game;
use super::Lobby;
use super::Phase;
use super::Role;
use super::Room;
use super::Seat;
use crate::Chips;
use crate::SEATS;
use crate::TOP_BID;
use crate::TableId;
use crate::UserId;
use crate::cards::CardId;
use crate::cards::Catalog;
use crate::cards::Deck;
use crate::protocol::Response;
use crate::session::Session;
use rand::Rng;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;
use std::sync::Weak;
use tokio::sync::RwLock;

/// A table seats up to three participants and runs the hand lifecycle
/// wait -> bid -> play -> end -> restart. Every mutating operation takes
/// the write lock for its whole duration, broadcasts included, so all
/// observers see one total order of transitions. Robots peek through
/// `glance` under the read lock.
#[derive(Debug)]
pub struct Table {
    pub id: TableId,
    pub fee: Chips,
    pub allow_robot: bool,
    room: Weak<Room>,
    lobby: Weak<Lobby>,
    catalog: Arc<Catalog>,
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    seats: Vec<Seat>,
    game: Game,
}

/// read-only snapshot of what one participant may observe
#[derive(Debug)]
pub struct Glance {
    pub phase: Phase,
    pub my_turn: bool,
    pub has_bid: bool,
    pub mine: bool,
    pub last_play: Vec<CardId>,
    pub hand: Vec<CardId>,
}

impl Table {
    pub fn new(id: TableId, room: &Arc<Room>, lobby: &Arc<Lobby>) -> Arc<Table> {
        Arc::new(Table {
            id,
            fee: room.entrance_fee,
            allow_robot: room.allow_robot,
            room: Arc::downgrade(room),
            lobby: Arc::downgrade(lobby),
            catalog: lobby.catalog(),
            inner: RwLock::new(Inner {
                phase: Phase::Waiting,
                seats: Vec::with_capacity(SEATS),
                game: Game::new(),
            }),
        })
    }

    pub fn room(&self) -> Option<Arc<Room>> {
        self.room.upgrade()
    }
    pub fn lobby(&self) -> Option<Arc<Lobby>> {
        self.lobby.upgrade()
    }
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    pub async fn seated(&self) -> usize {
        self.inner.read().await.seats.len()
    }
    pub async fn vacancies(&self) -> usize {
        SEATS - self.seated().await
    }

    /// a fresh user id no one at this table carries
    pub async fn robot_id(&self) -> UserId {
        let inner = self.inner.read().await;
        loop {
            let id = rand::rng().random_range(1..10_000);
            if !inner.seats.iter().any(|s| s.user_id() == id) {
                return id;
            }
        }
    }

    pub async fn glance(&self, user: UserId) -> Option<Glance> {
        let inner = self.inner.read().await;
        let idx = inner.position(user)?;
        Some(Glance {
            phase: inner.phase,
            my_turn: inner.game.turn == Some(idx),
            has_bid: inner.seats[idx].has_bid,
            mine: inner.game.last_play_seat == Some(idx),
            last_play: inner.game.last_play.clone(),
            hand: inner.seats[idx].hand.clone(),
        })
    }
}

impl Table {
    /// Seat a participant. The third joiner closes the ring and triggers
    /// the deal. Full tables, duplicate ids, and mid-hand joins are
    /// rejected with a log line, the session is never told.
    pub async fn join(self: &Arc<Self>, session: &Arc<Session>) -> bool {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if inner.phase != Phase::Waiting {
            log::error!("user [{}] joins table {} mid-hand", session.id, self.id);
            return false;
        }
        if inner.seats.len() >= SEATS {
            log::error!("user [{}] joins table {} but it is full", session.id, self.id);
            return false;
        }
        if inner.position(session.id).is_some() {
            log::error!("user [{}] already at table {}", session.id, self.id);
            return false;
        }
        log::debug!("user [{}] [{}] joins table {}", session.id, session.name, self.id);
        session.bind(self);
        let mut seat = Seat::take(session.clone());
        seat.ready = true;
        inner.seats.push(seat);
        inner.sync_users(self.id);
        if inner.seats.len() == SEATS {
            inner.phase = Phase::Bidding;
            inner.deal();
        }
        true
    }

    /// One auction turn. A bid of 3 ends the auction at once; otherwise
    /// it ends when all three have spoken.
    pub async fn call_score(&self, session: &Arc<Session>, score: i64) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if inner.phase != Phase::Bidding {
            log::error!("user [{}] bids outside the auction", session.id);
            return;
        }
        let Some(idx) = inner.position(session.id) else {
            log::error!("user [{}] bids at a foreign table", session.id);
            return;
        };
        if inner.game.turn != Some(idx) {
            log::error!("user [{}] bids out of turn", session.id);
            return;
        }
        if inner.seats[idx].has_bid {
            log::error!("user [{}] bids twice", session.id);
            return;
        }
        if !(0..=TOP_BID).contains(&score) {
            log::error!("user [{}] bids {} which is no bid", session.id, score);
            return;
        }
        inner.seats[idx].has_bid = true;
        if score > inner.game.max_bid {
            inner.game.max_bid = score;
            inner.game.max_bidder = Some(idx);
        }
        let ended = score == TOP_BID || inner.seats.iter().all(|s| s.has_bid);
        if !ended {
            inner.game.turn = Some((idx + 1) % inner.seats.len());
        }
        inner.broadcast(&json!([Response::CallScore.code(), session.id, score, ended]));
        if ended {
            inner.conclude_auction();
        }
    }

    /// One playing turn: either a combination that stands up to the last
    /// play, any combination on a free turn, or a pass against a foreign
    /// play. Bombs and the rocket double the multiplier. Emptying the
    /// hand settles the table.
    pub async fn play(&self, session: &Arc<Session>, cards: Vec<CardId>) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if inner.phase != Phase::Playing {
            log::error!("user [{}] plays outside the hand", session.id);
            return;
        }
        let Some(idx) = inner.position(session.id) else {
            log::error!("user [{}] plays at a foreign table", session.id);
            return;
        };
        if inner.game.turn != Some(idx) {
            log::error!("user [{}] plays out of turn", session.id);
            return;
        }
        let fresh = inner.game.last_play.is_empty() || inner.game.last_play_seat == Some(idx);
        if cards.is_empty() {
            if fresh {
                log::error!("user [{}] passes on a free turn", session.id);
                return;
            }
        } else {
            if !inner.seats[idx].holds(&cards) {
                log::error!("user [{}] plays cards outside their hand", session.id);
                return;
            }
            let (sign, double) = if fresh {
                if self.catalog.classify(&cards).is_none() {
                    log::error!("user [{}] plays no legal combination", session.id);
                    return;
                }
                self.catalog.compare(&[], &cards)
            } else {
                self.catalog.compare(&inner.game.last_play, &cards)
            };
            if sign <= 0 {
                log::error!("user [{}] fails to beat the last play", session.id);
                return;
            }
            if double {
                inner.game.multiplier *= 2;
            }
            inner.game.last_play_seat = Some(idx);
            inner.game.last_play = cards.clone();
            inner.seats[idx].discard(&cards);
        }
        let finished = !cards.is_empty() && inner.seats[idx].hand.is_empty();
        if !finished {
            inner.game.turn = Some((idx + 1) % inner.seats.len());
        }
        inner.broadcast(&json!([Response::ShotPoker.code(), session.id, cards]));
        if finished {
            inner.settle(idx, self.fee);
            log::debug!("table [{}] game over", self.id);
        }
    }

    pub async fn chat(&self, session: &Arc<Session>, text: &str) {
        let inner = self.inner.read().await;
        inner.broadcast(&json!([Response::Chat.code(), session.id, text]));
    }

    /// Mark the sender ready; once everyone is, reset the scratch state
    /// and deal the next hand.
    pub async fn restart(&self, session: &Arc<Session>) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if inner.phase != Phase::Ended {
            log::error!("user [{}] restarts a table that is not ended", session.id);
            return;
        }
        let Some(idx) = inner.position(session.id) else {
            log::error!("user [{}] restarts a foreign table", session.id);
            return;
        };
        inner.seats[idx].ready = true;
        if !inner.seats.iter().all(|s| s.ready) {
            return;
        }
        inner.game.reset();
        for seat in inner.seats.iter_mut() {
            seat.reset();
        }
        if let Some(creator) = inner.seats.first() {
            creator.send(&json!([Response::Restart.code()]));
        }
        if inner.seats.len() == SEATS {
            inner.phase = Phase::Bidding;
            inner.deal();
        } else {
            inner.phase = Phase::Waiting;
        }
    }

    /// Drop a participant. Survivors are re-synced; a table left without
    /// two participants, or with none but robots, is removed from its
    /// room, which closes the robots' queues and ends their drivers.
    pub async fn depart(&self, session: &Arc<Session>) {
        let dismantle = {
            let mut guard = self.inner.write().await;
            let inner = &mut *guard;
            let Some(idx) = inner.position(session.id) else {
                return;
            };
            let seat = inner.seats.remove(idx);
            seat.session.unbind();
            log::debug!("user [{}] leaves table {}", session.id, self.id);
            inner.game.turn = shift(inner.game.turn, idx);
            inner.game.max_bidder = shift(inner.game.max_bidder, idx);
            inner.game.last_play_seat = shift(inner.game.last_play_seat, idx);
            if inner.game.first_bidder > idx {
                inner.game.first_bidder -= 1;
            }
            if inner.game.first_bidder >= inner.seats.len() {
                inner.game.first_bidder = 0;
            }
            let habitable =
                inner.seats.len() > 1 && inner.seats.iter().any(|s| !s.session.robot);
            if habitable {
                inner.sync_users(self.id);
            } else {
                for seat in inner.seats.drain(..) {
                    seat.session.unbind();
                }
            }
            !habitable
        };
        if dismantle {
            if let Some(room) = self.room.upgrade() {
                room.drop_table(self.id).await;
            }
            log::info!("table {} dismantled", self.id);
        }
    }
}

/// re-aim a seat index after the given position was removed
fn shift(seat: Option<usize>, removed: usize) -> Option<usize> {
    match seat {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}

impl Inner {
    fn position(&self, user: UserId) -> Option<usize> {
        self.seats.iter().position(|s| s.user_id() == user)
    }

    fn broadcast(&self, frame: &Value) {
        for seat in self.seats.iter() {
            seat.send(frame);
        }
    }

    fn sync_users(&self, table: TableId) {
        let roster = self
            .seats
            .iter()
            .map(|s| json!([s.user_id(), s.session.name]))
            .collect::<Vec<Value>>();
        self.broadcast(&json!([Response::JoinTable.code(), table, roster]));
    }

    /// 17 cards each in ring order off a shuffled deck, 3 left hidden as
    /// the kitty; every hand sorted ascending before announcement
    fn deal(&mut self) {
        log::debug!("deal poker");
        let mut deck = Deck::shuffled();
        for seat in self.seats.iter_mut() {
            seat.ready = false;
        }
        for _ in 0..crate::CARDS_PER_SEAT {
            for seat in self.seats.iter_mut() {
                seat.hand.extend(deck.draw());
            }
        }
        self.game.kitty = deck.rest();
        self.game.turn = Some(self.game.first_bidder);
        let opener = self.seats[self.game.first_bidder].user_id();
        for seat in self.seats.iter_mut() {
            seat.hand.sort_unstable();
            seat.send(&json!([Response::DealPoker.code(), opener, &seat.hand]));
        }
    }

    /// The auction is over: rotate the opener for the next hand, fall
    /// back to the creator at bid 1 when nobody bid, crown the landlord,
    /// reveal the kitty into their hand and give them the turn.
    fn conclude_auction(&mut self) {
        self.phase = Phase::Playing;
        self.game.first_bidder = (self.game.first_bidder + 1) % self.seats.len();
        if self.game.max_bidder.is_none() || self.game.max_bid == 0 {
            self.game.max_bidder = Some(0);
            self.game.max_bid = 1;
        }
        let landlord = self.game.max_bidder.unwrap_or(0);
        self.seats[landlord].role = Role::Landlord;
        self.game.turn = Some(landlord);
        let kitty = self.game.kitty.clone();
        self.seats[landlord].hand.extend(&kitty);
        self.seats[landlord].hand.sort_unstable();
        let user = self.seats[landlord].user_id();
        self.broadcast(&json!([Response::ShowPoker.code(), user, kitty]));
    }

    /// Per-recipient settlement: the winner's own frame shows the raked
    /// double payout, everyone else's shows the plain payout, and each
    /// frame reveals the other participants' remaining hands.
    fn settle(&mut self, winner: usize, fee: Chips) {
        self.phase = Phase::Ended;
        let payout = fee * self.game.max_bid * self.game.multiplier;
        let champion = self.seats[winner].user_id();
        for (i, seat) in self.seats.iter().enumerate() {
            let amount = if i == winner { payout * 2 - 100 } else { payout };
            let mut frame = vec![
                json!(Response::GameOver.code()),
                json!(champion),
                json!(amount),
            ];
            for peer in self.seats.iter().enumerate().filter(|&(j, _)| j != i) {
                let mut reveal = vec![json!(peer.1.user_id())];
                reveal.extend(peer.1.hand.iter().map(|id| json!(id)));
                frame.push(Value::Array(reveal));
            }
            seat.send(&Value::Array(frame));
        }
    }
}
