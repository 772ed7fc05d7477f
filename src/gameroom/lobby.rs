use super::Room;
use super::Table;
use crate::ENTRANCE_FEE;
use crate::RoomId;
use crate::cards::Catalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;

/// Process-wide registry: the static room set, the monotonic table-id
/// counter, and the shared play catalog. Owned by the server and passed
/// by reference, never a global.
#[derive(Debug)]
pub struct Lobby {
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,
    count: AtomicI64,
    catalog: Arc<Catalog>,
}

impl Lobby {
    /// room 1 fills empty chairs with robots, room 2 is humans only
    pub fn with(catalog: Catalog) -> Arc<Lobby> {
        let rooms = HashMap::from([
            (1, Room::new(1, true, ENTRANCE_FEE)),
            (2, Room::new(2, false, ENTRANCE_FEE)),
        ]);
        Arc::new(Lobby {
            rooms: RwLock::new(rooms),
            count: AtomicI64::new(0),
            catalog: Arc::new(catalog),
        })
    }

    /// load or regenerate the catalog cache, then open the rooms.
    /// a catalog failure is fatal to startup.
    pub fn open() -> anyhow::Result<Arc<Lobby>> {
        Ok(Self::with(Catalog::load(crate::RULE_CACHE)?))
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    pub async fn room(&self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.read().await.get(&id).cloned()
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        let mut ids = self.rooms.read().await.keys().copied().collect::<Vec<RoomId>>();
        ids.sort_unstable();
        ids
    }

    /// allocate the next table id and seat the table in its room
    pub async fn create_table(self: &Arc<Self>, room: &Arc<Room>) -> Arc<Table> {
        let id = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        let table = Table::new(id, room, self);
        room.adopt(table.clone()).await;
        log::debug!("created table {} in room {}", id, room.id);
        table
    }
}
