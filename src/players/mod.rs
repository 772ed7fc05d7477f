mod robot;

pub use robot::*;
