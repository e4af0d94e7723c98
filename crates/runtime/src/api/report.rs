//! Renderer-facing views of the board and of turn deltas.
//!
//! Engine types refer to objects by [`ObjectId`](puzzle_core::ObjectId);
//! reports resolve them to identifiers and tag changes with plain strings so
//! a host can serialize them without knowing the compiled game.
use puzzle_core::{
    CompiledGame, Direction, Level, Movement, ObjectDelta, ObjectDeltaKind, Position, RuleDelta,
    SubturnHistory,
};
use serde::{Deserialize, Serialize};

/// Objects present at one position, bottom layer first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    pub x: i32,
    pub y: i32,
    pub objects: Vec<String>,
}

/// Snapshot of the current level in raster order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level_idx: usize,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellState>,
}

impl LevelState {
    pub fn capture(level: &Level, game: &CompiledGame) -> Self {
        let cells = level
            .cells()
            .map(|(position, cell)| CellState {
                x: position.x,
                y: position.y,
                objects: cell
                    .objects()
                    .filter_map(|id| game.identifier(id))
                    .map(str::to_owned)
                    .collect(),
            })
            .collect();

        Self {
            level_idx: level.level_idx,
            width: level.width,
            height: level.height,
            cells,
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&CellState> {
        self.cells.iter().find(|cell| cell.x == x && cell.y == y)
    }

    /// True if any object at `(x, y)` is named `name` (case-insensitive).
    pub fn has(&self, x: i32, y: i32, name: &str) -> bool {
        self.cell(x, y).is_some_and(|cell| {
            cell.objects
                .iter()
                .any(|object| object.eq_ignore_ascii_case(name))
        })
    }

    /// Positions holding an object named `name`, in raster order.
    pub fn positions_of(&self, name: &str) -> Vec<(i32, i32)> {
        self.cells
            .iter()
            .filter(|cell| {
                cell.objects
                    .iter()
                    .any(|object| object.eq_ignore_ascii_case(name))
            })
            .map(|cell| (cell.x, cell.y))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReport {
    pub object: String,
    /// `appear`, `disappear`, `create`, `destroy`, `move` or `stationary`.
    pub kind: String,
    /// Intent written by a `move` change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Movement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub x: i32,
    pub y: i32,
    pub changes: Vec<ObjectReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    pub line: usize,
    pub direction: Direction,
    pub origin: Position,
    pub cells: Vec<CellReport>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubturnReport {
    pub rules: Vec<RuleReport>,
}

/// Resolves a turn's deltas against `game`.
pub fn turn_report(subturns: &[SubturnHistory], game: &CompiledGame) -> Vec<SubturnReport> {
    subturns
        .iter()
        .map(|subturn| SubturnReport {
            rules: subturn.steps.iter().map(|step| rule_report(step, game)).collect(),
        })
        .collect()
}

fn rule_report(step: &RuleDelta, game: &CompiledGame) -> RuleReport {
    let cells = step
        .cell_deltas
        .iter()
        .map(|cell| CellReport {
            x: cell.position.x,
            y: cell.position.y,
            changes: cell
                .deltas
                .iter()
                .filter_map(|delta| object_report(delta, game))
                .collect(),
        })
        .collect();

    RuleReport {
        line: step.rule_line,
        direction: step.direction,
        origin: step.origin,
        cells,
    }
}

fn object_report(delta: &ObjectDelta, game: &CompiledGame) -> Option<ObjectReport> {
    let movement = match delta.kind {
        ObjectDeltaKind::Move(movement) => Some(movement),
        _ => None,
    };
    Some(ObjectReport {
        object: game.identifier(delta.object)?.to_owned(),
        kind: delta.kind.as_ref().to_owned(),
        movement,
    })
}
