mod game;
mod lobby;
mod room;
mod seat;
mod table;

pub use game::*;
pub use lobby::*;
pub use room::*;
pub use seat::*;
pub use table::*;
