//! Engine defect reporting.
//!
//! Content mistakes are rejected by the compiler before a game ever reaches
//! the engine, so anything reported here means the engine itself produced or
//! received inconsistent data.

use crate::game::ObjectId;
use crate::state::Position;

/// Internal inconsistency detected while applying or reverting deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("delta references unknown object {object}")]
    UnknownObject { object: ObjectId },

    #[error("delta position {position} is outside the level")]
    OutOfBounds { position: Position },

    #[error("object {object} expected at {position} is not there")]
    MissingOccupant { object: ObjectId, position: Position },

    #[error("cannot restore object {object} at {position}: layer held by {occupant}")]
    LayerOccupied {
        object: ObjectId,
        occupant: ObjectId,
        position: Position,
    },
}
