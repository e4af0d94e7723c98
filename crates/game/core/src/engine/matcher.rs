//! Pattern matching and rewriting of a single rule at a single origin.

use crate::game::{CellRule, CompiledGame, LayerId, MovementWrite, ObjectId, Outcome, Rule};
use crate::state::{Cell, CellDelta, Level, ObjectDelta, ObjectDeltaKind, Occupant, Position};

/// Concrete object a requirement matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Binding {
    pub layer: LayerId,
    pub object: ObjectId,
}

/// Per pattern cell, one binding per requirement.
pub(crate) type Bindings = Vec<Vec<Binding>>;

fn match_cell(pattern: &CellRule, cell: &Cell) -> Option<Vec<Binding>> {
    let excluded = pattern.exclusions.iter().any(|exclusion| {
        cell.occupants().any(|(_, occ)| {
            exclusion.objects.contains(occ.object) && exclusion.movement.accepts(occ.movement)
        })
    });
    if excluded {
        return None;
    }

    pattern
        .requirements
        .iter()
        .map(|requirement| {
            cell.occupants()
                .find(|(_, occ)| {
                    requirement.objects.contains(occ.object)
                        && requirement.movement.accepts(occ.movement)
                })
                .map(|(layer, occ)| Binding {
                    layer,
                    object: occ.object,
                })
        })
        .collect()
}

/// Matches `rule` with its first cell at `origin`.
pub(crate) fn match_rule(rule: &Rule, level: &Level, origin: Position) -> Option<Bindings> {
    rule.cells
        .iter()
        .enumerate()
        .map(|(step, pattern)| {
            let cell = level.cell(origin.offset(rule.direction, step as i32))?;
            match_cell(pattern, cell)
        })
        .collect()
}

fn write_movement(occupant: &mut Occupant, write: MovementWrite) -> Option<ObjectDeltaKind> {
    match write {
        MovementWrite::Unchanged => None,
        MovementWrite::Clear => occupant
            .movement
            .take()
            .map(|_| ObjectDeltaKind::Stationary),
        MovementWrite::Set(movement) => (occupant.movement != Some(movement)).then(|| {
            occupant.movement = Some(movement);
            ObjectDeltaKind::Move(movement)
        }),
    }
}

fn apply_cell(
    pattern: &CellRule,
    cell: &mut Cell,
    bindings: &[Binding],
    game: &CompiledGame,
) -> Vec<ObjectDelta> {
    let mut deltas = Vec::new();

    for (requirement, binding) in pattern.requirements.iter().zip(bindings) {
        if requirement.outcome != Outcome::Remove {
            continue;
        }
        let still_there = cell.layer(binding.layer).map(|occ| occ.object) == Some(binding.object);
        if still_there {
            cell.take(binding.layer);
            deltas.push(ObjectDelta::new(binding.object, ObjectDeltaKind::Destroy));
        }
    }

    for (requirement, binding) in pattern.requirements.iter().zip(bindings) {
        let Outcome::Keep(write) = requirement.outcome else {
            continue;
        };
        if let Some(occupant) = cell.layer_mut(binding.layer) {
            if occupant.object == binding.object {
                if let Some(kind) = write_movement(occupant, write) {
                    deltas.push(ObjectDelta::new(binding.object, kind));
                }
            }
        }
    }

    for set in &pattern.clears {
        let doomed: Vec<(LayerId, ObjectId)> = cell
            .occupants()
            .filter(|(_, occ)| set.contains(occ.object))
            .map(|(layer, occ)| (layer, occ.object))
            .collect();
        for (layer, object) in doomed {
            cell.take(layer);
            deltas.push(ObjectDelta::new(object, ObjectDeltaKind::Destroy));
        }
    }

    for spawn in &pattern.spawns {
        let Some(def) = game.object(spawn.object) else {
            debug_assert!(false, "spawn of unknown object {}", spawn.object);
            continue;
        };
        match cell.layer_mut(def.layer) {
            Some(occupant) if occupant.object == spawn.object => {
                if let Some(movement) = spawn.movement {
                    if let Some(kind) = write_movement(occupant, MovementWrite::Set(movement)) {
                        deltas.push(ObjectDelta::new(spawn.object, kind));
                    }
                }
            }
            _ => {
                let placed = Occupant {
                    object: spawn.object,
                    movement: spawn.movement,
                };
                if let Some(previous) = cell.replace(def.layer, placed) {
                    deltas.push(ObjectDelta::new(previous.object, ObjectDeltaKind::Destroy));
                }
                deltas.push(ObjectDelta::new(spawn.object, ObjectDeltaKind::Create));
                if let Some(movement) = spawn.movement {
                    deltas.push(ObjectDelta::new(spawn.object, ObjectDeltaKind::Move(movement)));
                }
            }
        }
    }

    deltas
}

/// Rewrites the matched cells and returns the changes, cell by cell in
/// pattern order. Cells left unchanged are omitted; an empty result means
/// the match changed nothing.
pub(crate) fn apply_rule(
    rule: &Rule,
    level: &mut Level,
    game: &CompiledGame,
    origin: Position,
    bindings: &Bindings,
) -> Vec<CellDelta> {
    let mut cell_deltas = Vec::new();

    for (step, (pattern, cell_bindings)) in rule.cells.iter().zip(bindings).enumerate() {
        let position = origin.offset(rule.direction, step as i32);
        let Some(cell) = level.cell_mut(position) else {
            debug_assert!(false, "matched cell {position} left the level");
            continue;
        };
        let before = cell.clone();
        let deltas = apply_cell(pattern, cell, cell_bindings, game);
        // Net-zero rewrites (remove then re-place the same object) do not count.
        if *cell != before {
            cell_deltas.push(CellDelta { position, deltas });
        }
    }

    crate::state::delta::classify_transfers(&mut cell_deltas);
    cell_deltas
}
