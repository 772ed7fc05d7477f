use super::Table;
use crate::Chips;
use crate::RoomId;
use crate::SEATS;
use crate::TableId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A room groups tables under one entrance-fee and robot policy. Rooms
/// are created at startup and never destroyed.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub allow_robot: bool,
    pub entrance_fee: Chips,
    tables: RwLock<HashMap<TableId, Arc<Table>>>,
}

impl Room {
    pub fn new(id: RoomId, allow_robot: bool, entrance_fee: Chips) -> Arc<Room> {
        Arc::new(Room {
            id,
            allow_robot,
            entrance_fee,
            tables: RwLock::new(HashMap::new()),
        })
    }

    pub async fn table(&self, id: TableId) -> Option<Arc<Table>> {
        self.tables.read().await.get(&id).cloned()
    }

    pub async fn adopt(&self, table: Arc<Table>) {
        self.tables.write().await.insert(table.id, table);
    }

    pub async fn drop_table(&self, id: TableId) {
        self.tables.write().await.remove(&id);
    }

    /// joinable tables with their seat counts, for the table list
    pub async fn listing(&self) -> Vec<(TableId, usize)> {
        let tables = self.tables.read().await;
        let mut open = Vec::new();
        for table in tables.values() {
            let seated = table.seated().await;
            if seated < SEATS {
                open.push((table.id, seated));
            }
        }
        open.sort_unstable();
        open
    }
}
