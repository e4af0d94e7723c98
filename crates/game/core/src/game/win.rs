use super::object::ObjectSet;
use crate::state::{Cell, Level};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Quantifier {
    All,
    No,
    #[strum(serialize = "some", serialize = "any")]
    Some,
}

/// Compiled win predicate.
///
/// `target == None` only occurs with `No`/`Some`, which then ask about the
/// subject alone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinCondition {
    pub line: usize,
    pub quantifier: Quantifier,
    pub subject: ObjectSet,
    pub target: Option<ObjectSet>,
}

fn holds_any(cell: &Cell, set: &ObjectSet) -> bool {
    cell.objects().any(|id| set.contains(id))
}

impl WinCondition {
    pub fn is_satisfied(&self, level: &Level) -> bool {
        let mut subject_cells = level
            .cells()
            .map(|(_, cell)| cell)
            .filter(|cell| holds_any(cell, &self.subject));
        let on_target = |cell: &&Cell| match &self.target {
            Some(target) => holds_any(cell, target),
            None => true,
        };

        match self.quantifier {
            Quantifier::All => subject_cells.all(|cell| on_target(&cell)),
            Quantifier::No => !subject_cells.any(|cell| on_target(&cell)),
            Quantifier::Some => subject_cells.any(|cell| on_target(&cell)),
        }
    }
}

/// True when there is at least one condition and all of them hold.
pub fn is_won(conditions: &[WinCondition], level: &Level) -> bool {
    !conditions.is_empty() && conditions.iter().all(|c| c.is_satisfied(level))
}
