use crate::ROBOT_DELAY;
use crate::ROBOT_QUEUE;
use crate::TOP_BID;
use crate::cards::CardId;
use crate::cards::Catalog;
use crate::gameroom::Glance;
use crate::gameroom::Phase;
use crate::gameroom::Table;
use crate::protocol::Request;
use crate::protocol::Response;
use crate::session::Session;
use serde_json::Value;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Weak;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::channel;

/// Fill the table's empty chairs with robots, one at a time. A robot is
/// an ordinary session whose outbox is a bounded queue drained by its
/// driver task; its requests go through the same dispatcher humans use.
pub fn fill(table: Arc<Table>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        while table.vacancies().await > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            let Some(lobby) = table.lobby() else { return };
            let Some(room) = table.room() else { return };
            let name = format!("ROBOT-{}", table.seated().await);
            let id = table.robot_id().await;
            let (tx, rx) = channel(ROBOT_QUEUE);
            let robot = Session::robot(id, name, lobby, tx);
            robot.enter_room(room);
            tokio::spawn(drive(Arc::downgrade(&robot), rx));
            log::debug!("robot [{}] [{}] takes a chair at table {}", robot.id, robot.name, table.id);
            if !table.join(&robot).await {
                return;
            }
        }
    })
}

/// React to table broadcasts. The queue's only sender lives in the
/// robot's seat, so tearing the table down closes the queue and retires
/// the driver; the weak handle covers the race in between.
pub async fn drive(robot: Weak<Session>, mut inbox: Receiver<Value>) {
    while let Some(frame) = inbox.recv().await {
        let Some(session) = robot.upgrade() else { break };
        let Some(frame) = frame.as_array() else { continue };
        let Some(code) = frame.first().and_then(Value::as_i64) else { continue };
        let Ok(response) = Response::try_from(code) else { continue };
        match response {
            Response::DealPoker | Response::CallScore => auto_call(&session).await,
            Response::ShowPoker | Response::ShotPoker => auto_shot(&session).await,
            Response::GameOver => auto_ready(&session).await,
            _ => {}
        }
    }
    log::debug!("robot driver retired");
}

/// bid the maximum whenever the auction reaches us
async fn auto_call(session: &Arc<Session>) {
    tokio::time::sleep(ROBOT_DELAY).await;
    let Some(table) = session.table() else { return };
    let Some(glance) = table.glance(session.id).await else { return };
    if glance.phase == Phase::Bidding && glance.my_turn && !glance.has_bid {
        log::debug!("robot [{}] calls {}", session.name, TOP_BID);
        session
            .dispatch(&[json!(Request::CallScore.code()), json!(TOP_BID)])
            .await;
    }
}

async fn auto_shot(session: &Arc<Session>) {
    tokio::time::sleep(ROBOT_DELAY).await;
    let Some(table) = session.table() else { return };
    let Some(glance) = table.glance(session.id).await else { return };
    if glance.phase != Phase::Playing || !glance.my_turn {
        return;
    }
    let cards = choice(&table.catalog(), &glance);
    log::debug!("robot [{}] plays {:?}", session.name, cards);
    session
        .dispatch(&[json!(Request::ShotPoker.code()), json!(cards)])
        .await;
}

/// ready up for the next hand
async fn auto_ready(session: &Arc<Session>) {
    tokio::time::sleep(ROBOT_DELAY).await;
    session.dispatch(&[json!(Request::Restart.code())]).await;
}

/// Lowest single on a free turn, otherwise the smallest play that covers
/// the standing one; empty means pass.
pub fn choice(catalog: &Catalog, glance: &Glance) -> Vec<CardId> {
    if glance.last_play.is_empty() || glance.mine {
        glance.hand.first().map(|&card| vec![card]).unwrap_or_default()
    } else {
        catalog.cards_above(&glance.hand, &glance.last_play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::materialize;
    use crate::gameroom::Lobby;
    use tokio::sync::mpsc::unbounded_channel;

    fn glance(hand: &str, last: &str, mine: bool) -> Glance {
        let deck = (0..crate::DECK_SIZE as CardId).collect::<Vec<CardId>>();
        Glance {
            phase: Phase::Playing,
            my_turn: true,
            has_bid: true,
            mine,
            last_play: materialize(&deck, last),
            hand: materialize(&deck, hand),
        }
    }

    #[test]
    fn leads_with_the_lowest_single() {
        let catalog = Catalog::new();
        let mine = glance("340", "", false);
        assert_eq!(choice(&catalog, &mine), vec![mine.hand[0]]);
        let returned = glance("340", "555", true);
        assert_eq!(choice(&catalog, &returned), vec![returned.hand[0]]);
    }

    #[test]
    fn covers_a_foreign_play_or_passes() {
        let catalog = Catalog::new();
        let able = glance("34455", "33", false);
        let played = choice(&catalog, &able);
        assert!(catalog.compare(&able.last_play, &played).0 > 0);
        let beaten = glance("345", "22", false);
        assert!(choice(&catalog, &beaten).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn robots_fill_bid_and_open_the_hand() {
        let lobby = Lobby::with(crate::cards::Catalog::new());
        let room = lobby.room(1).await.unwrap();
        let table = lobby.create_table(&room).await;
        let (tx, mut inbox) = unbounded_channel();
        let hero = Session::human(1, "P1".to_string(), lobby.clone(), tx);
        hero.enter_room(room);
        assert!(table.join(&hero).await);
        tokio::spawn(fill(table.clone()));
        for _ in 0..1000 {
            if table.vacancies().await == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        assert_eq!(table.seated().await, 3);
        // the hero opens the auction with a zero bid, both robots max it
        hero.dispatch(&[json!(Request::CallScore.code()), json!(0)]).await;
        for _ in 0..1000 {
            let glance = table.glance(1).await.unwrap();
            if glance.phase == Phase::Playing && glance.my_turn {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        // a robot landlord took the kitty and led its lowest single, the
        // other robot answered or passed, and play came back around
        let glance = table.glance(1).await.unwrap();
        assert_eq!(glance.phase, Phase::Playing);
        assert!(glance.my_turn);
        assert!(!glance.last_play.is_empty());
        assert_eq!(glance.hand.len(), crate::CARDS_PER_SEAT);
        while let Ok(text) = inbox.try_recv() {
            let frame = serde_json::from_str::<Vec<Value>>(&text).unwrap();
            assert!(frame[0].as_i64().is_some());
        }
    }
}
