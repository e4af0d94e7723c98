mod common;
mod level;

pub use common::{Direction, Movement, Position};
pub use level::{Cell, Level, Occupant};
