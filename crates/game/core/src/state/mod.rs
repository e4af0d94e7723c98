//! Mutable board state and the deltas that describe changes to it.
pub mod delta;
pub mod types;

pub use delta::{
    CellDelta, ObjectDelta, ObjectDeltaKind, RuleDelta, SubturnHistory, TurnRecord, revert_turn,
};
pub use types::{Cell, Direction, Level, Movement, Occupant, Position};
