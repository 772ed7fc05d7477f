mod frame;
mod opcode;

pub use frame::*;
pub use opcode::*;
