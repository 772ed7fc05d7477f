//! Landlord server binary.
//!
//! Builds the play catalog, opens the rooms, and hosts the websocket
//! endpoint for live tables.

use landlord::gameroom::Lobby;
use landlord::hosting::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    landlord::init();
    let lobby = Lobby::open()?;
    Server::run(lobby).await?;
    Ok(())
}
