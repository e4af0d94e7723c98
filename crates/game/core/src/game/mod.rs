//! Compiled, immutable game definition.
//!
//! A [`CompiledGame`] owns the object arena, the ordered rule groups, win
//! conditions and the pristine level boards. Levels being played are clones
//! of those boards; they refer to objects by [`ObjectId`] only, so a compiled
//! game can be shared read-only between any number of boards.
mod graphics;
mod object;
mod rule;
mod win;

use std::collections::BTreeMap;

pub use graphics::{Color, ObjectGraphics};
pub use object::{LayerId, ObjectDef, ObjectId, ObjectSet};
pub use rule::{
    CellRule, DirectionSet, Exclusion, MovementMatch, MovementWrite, Outcome, Requirement, Rule,
    RuleCommands, RuleGroup, Spawn,
};
pub use win::{Quantifier, WinCondition, is_won};

use crate::state::Level;

/// Prelude settings of a game document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub homepage: Option<String>,
    /// Undo requests are ignored.
    pub noundo: bool,
    /// Restart requests are ignored.
    pub norestart: bool,
    /// Run one input-less turn whenever a level is loaded.
    pub run_rules_on_level_start: bool,
    /// Prelude keys the engine does not interpret, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

/// What a legend symbol denotes after resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendEntry {
    Object(ObjectId),
    /// Any one of the members.
    Property(ObjectSet),
    /// All of the members together.
    Aggregate(Vec<ObjectId>),
}

impl LegendEntry {
    /// Every object the entry may stand for.
    pub fn objects(&self) -> ObjectSet {
        match self {
            LegendEntry::Object(id) => ObjectSet::single(*id),
            LegendEntry::Property(set) => set.clone(),
            LegendEntry::Aggregate(ids) => ids.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledGame {
    pub metadata: GameMetadata,
    /// Arena indexed by [`ObjectId`].
    pub objects: Vec<ObjectDef>,
    pub layer_count: usize,
    /// Lower-cased symbol to resolution; includes object names.
    pub legend: BTreeMap<String, LegendEntry>,
    /// Objects marked by player input.
    pub player: ObjectSet,
    pub rule_groups: Vec<RuleGroup>,
    pub win_conditions: Vec<WinCondition>,
    pub levels: Vec<Level>,
}

impl CompiledGame {
    #[inline]
    pub fn object(&self, id: ObjectId) -> Option<&ObjectDef> {
        self.objects.get(id.index())
    }

    pub fn identifier(&self, id: ObjectId) -> Option<&str> {
        self.object(id).map(|def| def.identifier.as_str())
    }

    /// Object whose name matches `name` case-insensitively.
    pub fn object_named(&self, name: &str) -> Option<&ObjectDef> {
        self.objects
            .iter()
            .find(|def| def.identifier.eq_ignore_ascii_case(name))
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Fresh copy of level `index` as compiled.
    pub fn instantiate_level(&self, index: usize) -> Option<Level> {
        self.levels.get(index).cloned()
    }

    pub fn rule_count(&self) -> usize {
        self.rule_groups.iter().map(|group| group.rules.len()).sum()
    }
}
