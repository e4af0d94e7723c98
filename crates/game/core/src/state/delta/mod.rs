//! Auditable record of every change a turn makes.
//!
//! Deltas are nested the way the engine produces them: a turn is a list of
//! subturns (one per rule group that fired), a subturn lists rule firings, a
//! firing lists the cells it touched, and a cell lists per-object changes in
//! the order they were applied. Replaying a turn's deltas backwards restores
//! the board as it was before the turn.
mod revert;

pub use revert::revert_turn;

use crate::engine::InputType;
use crate::game::ObjectId;
use crate::state::{Direction, Movement, Position};

/// Kind of a single object change.
///
/// `Appear`/`Disappear` mark objects that moved between cells within one rule
/// firing; `Create`/`Destroy` mark objects with no counterpart in that firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ObjectDeltaKind {
    Appear,
    Disappear,
    Create,
    Destroy,
    /// Movement intent written.
    Move(Movement),
    /// Movement intent cleared.
    Stationary,
}

impl ObjectDeltaKind {
    /// True when the object was added to the cell.
    pub fn is_placement(self) -> bool {
        matches!(self, ObjectDeltaKind::Appear | ObjectDeltaKind::Create)
    }

    /// True when the object was taken out of the cell.
    pub fn is_removal(self) -> bool {
        matches!(self, ObjectDeltaKind::Disappear | ObjectDeltaKind::Destroy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDelta {
    pub object: ObjectId,
    pub kind: ObjectDeltaKind,
}

impl ObjectDelta {
    pub fn new(object: ObjectId, kind: ObjectDeltaKind) -> Self {
        Self { object, kind }
    }
}

/// Ordered object changes made at one position by one rule firing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellDelta {
    pub position: Position,
    pub deltas: Vec<ObjectDelta>,
}

/// One rule firing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDelta {
    /// Source line of the rule that fired.
    pub rule_line: usize,
    pub direction: Direction,
    /// Position of the first pattern cell.
    pub origin: Position,
    pub cell_deltas: Vec<CellDelta>,
}

/// Rule firings of one rule group until it reached its fixpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubturnHistory {
    pub steps: Vec<RuleDelta>,
}

impl SubturnHistory {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One player input and everything it caused; the unit of undo.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    /// `None` for turns run without input (level start).
    pub input: Option<InputType>,
    pub subturns: Vec<SubturnHistory>,
}

impl TurnRecord {
    pub fn is_noop(&self) -> bool {
        self.subturns.iter().all(SubturnHistory::is_empty)
    }

    pub fn rule_count(&self) -> usize {
        self.subturns.iter().map(|subturn| subturn.steps.len()).sum()
    }
}

/// Relabels placements/removals of a single firing: objects that both appear
/// and disappear within the firing moved (`Appear`/`Disappear`), the rest were
/// created or destroyed.
pub(crate) fn classify_transfers(cell_deltas: &mut [CellDelta]) {
    use std::collections::BTreeMap;

    let mut seen: BTreeMap<ObjectId, (bool, bool)> = BTreeMap::new();
    for delta in cell_deltas.iter().flat_map(|cell| cell.deltas.iter()) {
        let entry = seen.entry(delta.object).or_default();
        entry.0 |= delta.kind.is_placement();
        entry.1 |= delta.kind.is_removal();
    }

    for delta in cell_deltas.iter_mut().flat_map(|cell| cell.deltas.iter_mut()) {
        let transferred = matches!(seen.get(&delta.object), Some((true, true)));
        delta.kind = match delta.kind {
            kind if kind.is_placement() && transferred => ObjectDeltaKind::Appear,
            kind if kind.is_placement() => ObjectDeltaKind::Create,
            kind if kind.is_removal() && transferred => ObjectDeltaKind::Disappear,
            kind if kind.is_removal() => ObjectDeltaKind::Destroy,
            other => other,
        };
    }
}
