use super::Outbox;
use crate::Chips;
use crate::UserId;
use crate::gameroom::Lobby;
use crate::gameroom::Room;
use crate::gameroom::Table;
use crate::protocol;
use crate::protocol::Request;
use crate::protocol::Response;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;
use std::sync::RwLock;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::UnboundedSender;

/// One connected participant, human or robot. A session owns its
/// identity, its outbox, and its current room/table bindings; every
/// inbound frame funnels through `dispatch`, robots included, so the
/// whole protocol has a single entry point.
#[derive(Debug)]
pub struct Session {
    pub id: UserId,
    pub name: String,
    pub coin: Chips,
    pub robot: bool,
    pub outbox: Outbox,
    lobby: Arc<Lobby>,
    room: RwLock<Option<Arc<Room>>>,
    table: RwLock<Option<Arc<Table>>>,
}

impl Session {
    pub fn human(
        id: UserId,
        name: String,
        lobby: Arc<Lobby>,
        tx: UnboundedSender<String>,
    ) -> Arc<Session> {
        Arc::new(Session {
            id,
            name,
            coin: 0,
            robot: false,
            outbox: Outbox::Socket(tx),
            lobby,
            room: RwLock::new(None),
            table: RwLock::new(None),
        })
    }

    pub fn robot(
        id: UserId,
        name: String,
        lobby: Arc<Lobby>,
        tx: Sender<Value>,
    ) -> Arc<Session> {
        Arc::new(Session {
            id,
            name,
            coin: crate::ROBOT_COIN,
            robot: true,
            outbox: Outbox::Queue(tx),
            lobby,
            room: RwLock::new(None),
            table: RwLock::new(None),
        })
    }

    pub fn room(&self) -> Option<Arc<Room>> {
        self.room.read().expect("room binding").clone()
    }
    pub fn table(&self) -> Option<Arc<Table>> {
        self.table.read().expect("table binding").clone()
    }
    pub fn enter_room(&self, room: Arc<Room>) {
        *self.room.write().expect("room binding") = Some(room);
    }
    pub fn bind(&self, table: &Arc<Table>) {
        *self.table.write().expect("table binding") = Some(table.clone());
    }
    pub fn unbind(&self) {
        self.table.write().expect("table binding").take();
    }

    /// disconnect cleanup: give up the seat, if any
    pub async fn leave(self: &Arc<Self>) {
        let table = self.table.write().expect("table binding").take();
        if let Some(table) = table {
            table.depart(self).await;
        }
    }
}

impl Session {
    /// one inbound text frame; bad JSON is logged and survives
    pub async fn handle_text(self: &Arc<Self>, text: &str) {
        match protocol::decode(text) {
            Ok(frame) => self.dispatch(&frame).await,
            Err(e) => log::error!("user [{}] sent a malformed frame: {}", self.id, e),
        }
    }

    /// Route by opcode. Protocol, rule, and state violations all land in
    /// a log line and nothing else; the session always survives them.
    pub async fn dispatch(self: &Arc<Self>, frame: &[Value]) {
        let Some(code) = protocol::opcode(frame) else {
            log::error!("user [{}] sent a frame without an opcode", self.id);
            return;
        };
        let Ok(request) = Request::try_from(code) else {
            log::error!("user [{}] sent unknown opcode {}", self.id, code);
            return;
        };
        log::debug!("user [{}] requests {:?}", self.id, request);
        match request {
            Request::Cheat => self.on_cheat(frame),
            Request::Login => self.on_login(),
            Request::RoomList => self.on_room_list().await,
            Request::TableList => self.on_table_list().await,
            Request::JoinRoom => self.on_join_room(frame).await,
            Request::JoinTable => self.on_join_table(frame).await,
            Request::NewTable => self.on_new_table().await,
            Request::CallScore => self.on_call_score(frame).await,
            Request::ShotPoker => self.on_shot_poker(frame).await,
            Request::Chat => self.on_chat(frame).await,
            Request::Restart => self.on_restart().await,
            // server-initiated pairs, nothing to answer inbound
            Request::DealPoker | Request::ShowPoker | Request::GameOver => {}
        }
    }

    fn on_cheat(&self, frame: &[Value]) {
        let target = protocol::integer(frame, 1).unwrap_or(self.id);
        log::warn!("user [{}] invokes cheat on [{}]", self.id, target);
        self.outbox.send(json!([Response::Cheat.code(), target]));
    }

    fn on_login(&self) {
        self.outbox
            .send(json!([Response::Login.code(), self.id, self.name]));
    }

    async fn on_room_list(&self) {
        let rooms = self.lobby.room_ids().await;
        self.outbox.send(json!([Response::RoomList.code(), rooms]));
    }

    async fn on_table_list(&self) {
        let Some(room) = self.room() else {
            log::error!("user [{}] lists tables without a room", self.id);
            return;
        };
        let listing = room.listing().await;
        self.outbox
            .send(json!([Response::TableList.code(), listing]));
    }

    async fn on_join_room(&self, frame: &[Value]) {
        let Some(id) = protocol::integer(frame, 1) else {
            log::error!("user [{}] joins a room without naming it", self.id);
            return;
        };
        let Some(room) = self.lobby.room(id).await else {
            log::error!("user [{}] joins unknown room {}", self.id, id);
            return;
        };
        self.enter_room(room);
        self.outbox.send(json!([Response::JoinRoom.code(), id]));
    }

    async fn on_join_table(self: &Arc<Self>, frame: &[Value]) {
        let Some(room) = self.room() else {
            log::error!("user [{}] joins a table without a room", self.id);
            return;
        };
        let Some(id) = protocol::integer(frame, 1) else {
            log::error!("user [{}] joins a table without naming it", self.id);
            return;
        };
        let Some(table) = room.table(id).await else {
            log::error!("user [{}] joins unknown table {}", self.id, id);
            return;
        };
        self.seat_at(table).await;
    }

    async fn on_new_table(self: &Arc<Self>) {
        let Some(room) = self.room() else {
            log::error!("user [{}] opens a table without a room", self.id);
            return;
        };
        let table = self.lobby.create_table(&room).await;
        self.outbox.send(json!([Response::NewTable.code(), table.id]));
        self.seat_at(table).await;
    }

    /// take the seat; in robot rooms, kick off the auto-fill afterwards
    async fn seat_at(self: &Arc<Self>, table: Arc<Table>) {
        if !table.join(self).await {
            return;
        }
        if table.allow_robot && table.vacancies().await > 0 {
            tokio::spawn(crate::players::fill(table));
        }
    }

    async fn on_call_score(self: &Arc<Self>, frame: &[Value]) {
        let Some(table) = self.table() else {
            log::error!("user [{}] bids without a table", self.id);
            return;
        };
        let Some(score) = protocol::integer(frame, 1) else {
            log::error!("user [{}] bids without a score", self.id);
            return;
        };
        table.call_score(self, score).await;
    }

    async fn on_shot_poker(self: &Arc<Self>, frame: &[Value]) {
        let Some(table) = self.table() else {
            log::error!("user [{}] plays without a table", self.id);
            return;
        };
        let Some(cards) = protocol::cards(frame, 1) else {
            log::error!("user [{}] plays an unreadable hand", self.id);
            return;
        };
        table.play(self, cards).await;
    }

    async fn on_chat(self: &Arc<Self>, frame: &[Value]) {
        let Some(table) = self.table() else {
            log::error!("user [{}] chats without a table", self.id);
            return;
        };
        let Some(text) = protocol::text(frame, 1) else {
            return;
        };
        table.chat(self, text).await;
    }

    async fn on_restart(self: &Arc<Self>) {
        let Some(table) = self.table() else {
            log::error!("user [{}] restarts without a table", self.id);
            return;
        };
        table.restart(self).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Catalog;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    fn human(id: UserId, lobby: &Arc<Lobby>) -> (Arc<Session>, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (Session::human(id, format!("P{}", id), lobby.clone(), tx), rx)
    }

    fn drain(inbox: &mut UnboundedReceiver<String>) -> Vec<Vec<Value>> {
        let mut frames = Vec::new();
        while let Ok(text) = inbox.try_recv() {
            frames.push(serde_json::from_str(&text).unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn login_echoes_the_cookie_identity() {
        let lobby = Lobby::with(Catalog::new());
        let (session, mut inbox) = human(7, &lobby);
        session.dispatch(&[json!(Request::Login.code())]).await;
        let frames = drain(&mut inbox);
        assert_eq!(frames, vec![vec![json!(12), json!(7), json!("P7")]]);
    }

    #[tokio::test]
    async fn room_list_names_both_rooms() {
        let lobby = Lobby::with(Catalog::new());
        let (session, mut inbox) = human(7, &lobby);
        session.dispatch(&[json!(Request::RoomList.code())]).await;
        assert_eq!(drain(&mut inbox), vec![vec![json!(14), json!([1, 2])]]);
    }

    #[tokio::test]
    async fn table_flow_over_the_wire() {
        let lobby = Lobby::with(Catalog::new());
        let (first, mut inbox1) = human(1, &lobby);
        let (second, mut inbox2) = human(2, &lobby);
        first.handle_text("[17, 2]").await;
        first.handle_text("[21]").await;
        let frames = drain(&mut inbox1);
        assert_eq!(frames[0], vec![json!(18), json!(2)]);
        assert_eq!(frames[1][0], json!(22));
        let table_id = frames[1][1].as_i64().unwrap();
        assert_eq!(frames[2][0], json!(20));
        second.handle_text("[17, 2]").await;
        second.handle_text("[15]").await;
        let frames = drain(&mut inbox2);
        assert_eq!(frames[1], vec![json!(16), json!([[table_id, 1]])]);
        second
            .handle_text(&format!("[19, {}]", table_id))
            .await;
        let frames = drain(&mut inbox2);
        let sync = frames.last().unwrap();
        assert_eq!(sync[0], json!(20));
        assert_eq!(sync[2].as_array().unwrap().len(), 2);
        assert!(second.table().is_some());
    }

    #[tokio::test]
    async fn chat_relays_to_the_whole_table() {
        let lobby = Lobby::with(Catalog::new());
        let (first, mut inbox1) = human(1, &lobby);
        let (second, _inbox2) = human(2, &lobby);
        first.handle_text("[17, 2]").await;
        first.handle_text("[21]").await;
        let table = first.table().unwrap();
        second.enter_room(lobby.room(2).await.unwrap());
        second.handle_text(&format!("[19, {}]", table.id)).await;
        drain(&mut inbox1);
        second.handle_text(r#"[43, "zdravo"]"#).await;
        let frames = drain(&mut inbox1);
        assert_eq!(frames, vec![vec![json!(44), json!(2), json!("zdravo")]]);
    }

    #[tokio::test]
    async fn hostile_frames_never_kill_the_session() {
        let lobby = Lobby::with(Catalog::new());
        let (session, mut inbox) = human(7, &lobby);
        session.handle_text("not json at all").await;
        session.handle_text(r#"{"op": 33}"#).await;
        session.handle_text(r#"["x", 1]"#).await;
        session.handle_text("[999]").await;
        session.handle_text("[33, 3]").await;
        session.handle_text("[37, [0]]").await;
        session.handle_text("[45]").await;
        assert!(drain(&mut inbox).is_empty());
        session.dispatch(&[json!(Request::Login.code())]).await;
        assert_eq!(drain(&mut inbox).len(), 1);
    }

    #[tokio::test]
    async fn cheat_is_acknowledged_and_nothing_more() {
        let lobby = Lobby::with(Catalog::new());
        let (session, mut inbox) = human(7, &lobby);
        session.handle_text("[1, 42]").await;
        assert_eq!(drain(&mut inbox), vec![vec![json!(2), json!(42)]]);
    }
}
