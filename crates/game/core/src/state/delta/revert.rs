use super::{ObjectDeltaKind, SubturnHistory};
use crate::error::InvariantViolation;
use crate::game::CompiledGame;
use crate::state::{Level, Occupant};

/// Undoes `subturns` on `level` by replaying their deltas backwards.
///
/// Deltas that do not fit the board (object missing, slot already taken) are
/// engine defects: they are skipped and returned so the caller can report
/// them. Movement deltas need no inverse since intents are cleared between
/// turns.
pub fn revert_turn(
    level: &mut Level,
    game: &CompiledGame,
    subturns: &[SubturnHistory],
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let steps = subturns.iter().rev().flat_map(|subturn| subturn.steps.iter().rev());
    for step in steps {
        for cell_delta in step.cell_deltas.iter().rev() {
            let position = cell_delta.position;
            for delta in cell_delta.deltas.iter().rev() {
                let Some(def) = game.object(delta.object) else {
                    violations.push(InvariantViolation::UnknownObject {
                        object: delta.object,
                    });
                    continue;
                };
                let Some(cell) = level.cell_mut(position) else {
                    violations.push(InvariantViolation::OutOfBounds { position });
                    continue;
                };

                match delta.kind {
                    ObjectDeltaKind::Appear | ObjectDeltaKind::Create => {
                        let resident = cell.layer(def.layer).map(|occ| occ.object);
                        if resident == Some(delta.object) {
                            cell.take(def.layer);
                        } else {
                            violations.push(InvariantViolation::MissingOccupant {
                                object: delta.object,
                                position,
                            });
                        }
                    }
                    ObjectDeltaKind::Disappear | ObjectDeltaKind::Destroy => {
                        if let Some(occupant) = cell.layer(def.layer) {
                            violations.push(InvariantViolation::LayerOccupied {
                                object: delta.object,
                                occupant: occupant.object,
                                position,
                            });
                        } else {
                            cell.replace(def.layer, Occupant::still(delta.object));
                        }
                    }
                    ObjectDeltaKind::Move(_) | ObjectDeltaKind::Stationary => {}
                }
            }
        }
    }

    level.clear_movements();
    violations
}
