//! Compiled rewrite rules.
//!
//! Every [`Rule`] here has already been expanded to one absolute direction and
//! has its symbols resolved to object sets. Cells of a pattern are laid out
//! along the rule's direction starting from the match origin.

use bitflags::bitflags;

use super::object::{ObjectId, ObjectSet};
use crate::state::{Direction, Movement};

bitflags! {
    /// Absolute directions a source rule applies in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DirectionSet: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;

        const VERTICAL   = Self::UP.bits() | Self::DOWN.bits();
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const ORTHOGONAL = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}

impl DirectionSet {
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
        }
    }

    /// Members in [`Direction::ALL`] order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(Self::from_direction(*d)))
    }
}

bitflags! {
    /// Side effects a rule triggers when it matches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RuleCommands: u8 {
        /// Abort the turn and revert every change made during it.
        const CANCEL = 1 << 0;
        /// Mark the level as won once the turn completes.
        const WIN    = 1 << 1;
    }
}

/// Movement constraint on a matched object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementMatch {
    Any,
    Stationary,
    Exactly(Movement),
}

impl MovementMatch {
    #[inline]
    pub fn accepts(self, movement: Option<Movement>) -> bool {
        match self {
            MovementMatch::Any => true,
            MovementMatch::Stationary => movement.is_none(),
            MovementMatch::Exactly(expected) => movement == Some(expected),
        }
    }

    pub fn is_constrained(self) -> bool {
        !matches!(self, MovementMatch::Any)
    }
}

/// What a rewrite does to the movement intent of a kept object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementWrite {
    Unchanged,
    Clear,
    Set(Movement),
}

/// Fate of an object bound by a requirement once the rule fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Keep(MovementWrite),
    Remove,
}

/// Positive left-hand side entry: some object of `objects` must be present.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirement {
    pub objects: ObjectSet,
    pub movement: MovementMatch,
    pub outcome: Outcome,
}

/// Negative left-hand side entry: no object of `objects` may be present.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exclusion {
    pub objects: ObjectSet,
    pub movement: MovementMatch,
}

/// Object placed by the right-hand side without a left-hand side counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spawn {
    pub object: ObjectId,
    pub movement: Option<Movement>,
}

/// One cell of a rule: its match conditions and its rewrite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRule {
    pub requirements: Vec<Requirement>,
    pub exclusions: Vec<Exclusion>,
    /// Right-hand side `no` entries.
    pub clears: Vec<ObjectSet>,
    pub spawns: Vec<Spawn>,
}

/// Rule expanded to a single absolute direction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    /// 1-based source line, shared by every expansion of the source rule.
    pub line: usize,
    pub direction: Direction,
    pub cells: Vec<CellRule>,
    pub commands: RuleCommands,
}

impl Rule {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rules that are iterated to a fixpoint together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleGroup {
    pub rules: Vec<Rule>,
}
