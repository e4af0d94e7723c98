//! Rule expansion and pairing of left and right hand sides.
//!
//! Every source rule becomes one [`Rule`] per absolute direction it applies
//! in. Within a cell, a right-hand entry keeps the first unclaimed left-hand
//! requirement that resolves to the same objects, whatever alias either side
//! was written with; left-hand requirements nobody claims are removed and
//! right-hand entries without a partner are spawned.

use puzzle_core::{
    CellRule, Direction, DirectionSet, Exclusion, LegendEntry, Movement, MovementMatch,
    MovementWrite, ObjectSet, Outcome, Requirement, Rule, RuleCommands, RuleGroup, Spawn,
};

use super::CompileError;
use super::symbols::Symbols;
use crate::parser::{CommandKeyword, MovementKeyword, PatternCell, RuleDirection, RuleLine};

pub(crate) fn compile_rules(
    lines: &[RuleLine],
    symbols: &Symbols,
) -> Result<Vec<RuleGroup>, CompileError> {
    let mut groups: Vec<RuleGroup> = Vec::new();
    for line in lines {
        let rules = expand(line, symbols)?;
        match groups.last_mut() {
            Some(group) if line.joins_previous => group.rules.extend(rules),
            _ => groups.push(RuleGroup { rules }),
        }
    }
    Ok(groups)
}

fn direction_set(directions: &[RuleDirection]) -> DirectionSet {
    let set = directions
        .iter()
        .fold(DirectionSet::empty(), |set, direction| {
            set | match direction {
                RuleDirection::Up => DirectionSet::UP,
                RuleDirection::Down => DirectionSet::DOWN,
                RuleDirection::Left => DirectionSet::LEFT,
                RuleDirection::Right => DirectionSet::RIGHT,
                RuleDirection::Horizontal => DirectionSet::HORIZONTAL,
                RuleDirection::Vertical => DirectionSet::VERTICAL,
                RuleDirection::Orthogonal => DirectionSet::ORTHOGONAL,
            }
        });
    if set.is_empty() {
        DirectionSet::ORTHOGONAL
    } else {
        set
    }
}

fn commands(keywords: &[CommandKeyword]) -> RuleCommands {
    keywords
        .iter()
        .fold(RuleCommands::empty(), |set, keyword| {
            set | match keyword {
                CommandKeyword::Cancel => RuleCommands::CANCEL,
                CommandKeyword::Win => RuleCommands::WIN,
            }
        })
}

fn expand(line: &RuleLine, symbols: &Symbols) -> Result<Vec<Rule>, CompileError> {
    match &line.rhs {
        None if line.commands.is_empty() => {
            return Err(CompileError::RuleWithoutEffect { line: line.line });
        }
        Some(rhs) if rhs.len() != line.lhs.len() => {
            return Err(CompileError::CellCountMismatch {
                line: line.line,
                lhs: line.lhs.len(),
                rhs: rhs.len(),
            });
        }
        _ => {}
    }

    let commands = commands(&line.commands);
    let mut rules: Vec<Rule> = Vec::new();

    for direction in direction_set(&line.directions).directions() {
        let cells = line
            .lhs
            .iter()
            .enumerate()
            .map(|(index, lhs)| {
                let rhs = line.rhs.as_ref().and_then(|rhs| rhs.get(index));
                compile_cell(line.line, direction, lhs, rhs, symbols)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rule = Rule {
            line: line.line,
            direction,
            cells,
            commands,
        };
        // Direction is irrelevant to a single cell.
        let duplicate = rule.len() == 1 && rules.iter().any(|kept| kept.cells == rule.cells);
        if !duplicate {
            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Absolute movement of `keyword` in a rule applied along `direction`;
/// `None` for `stationary`.
fn absolute(keyword: MovementKeyword, direction: Direction) -> Option<Movement> {
    let movement = match keyword {
        MovementKeyword::Forward => direction.into(),
        MovementKeyword::Backward => direction.opposite().into(),
        MovementKeyword::TurnLeft => direction.rotate_ccw().into(),
        MovementKeyword::TurnRight => direction.rotate_cw().into(),
        MovementKeyword::Up => Movement::Up,
        MovementKeyword::Down => Movement::Down,
        MovementKeyword::Left => Movement::Left,
        MovementKeyword::Right => Movement::Right,
        MovementKeyword::Action => Movement::Action,
        MovementKeyword::Stationary => return None,
    };
    Some(movement)
}

fn movement_match(keyword: Option<MovementKeyword>, direction: Direction) -> MovementMatch {
    match keyword {
        None => MovementMatch::Any,
        Some(keyword) => {
            absolute(keyword, direction).map_or(MovementMatch::Stationary, MovementMatch::Exactly)
        }
    }
}

struct Claim {
    objects: ObjectSet,
    claimed: bool,
}

fn compile_cell(
    line: usize,
    direction: Direction,
    lhs: &PatternCell,
    rhs: Option<&PatternCell>,
    symbols: &Symbols,
) -> Result<CellRule, CompileError> {
    let mut cell = CellRule::default();
    // Parallel to `cell.requirements`.
    let mut claims: Vec<Claim> = Vec::new();

    for entry in &lhs.entries {
        let resolved = symbols.resolve(line, &entry.name)?;
        let movement = movement_match(entry.movement, direction);
        if entry.negated {
            cell.exclusions.push(Exclusion {
                objects: resolved.objects(),
                movement,
            });
            continue;
        }

        let sets: Vec<ObjectSet> = match resolved {
            LegendEntry::Aggregate(ids) => ids.iter().copied().map(ObjectSet::single).collect(),
            other => vec![other.objects()],
        };
        for objects in sets {
            claims.push(Claim {
                objects: objects.clone(),
                claimed: false,
            });
            cell.requirements.push(Requirement {
                objects,
                movement,
                outcome: Outcome::Remove,
            });
        }
    }

    let Some(rhs) = rhs else {
        for requirement in &mut cell.requirements {
            requirement.outcome = Outcome::Keep(MovementWrite::Unchanged);
        }
        return Ok(cell);
    };

    for entry in &rhs.entries {
        let resolved = symbols.resolve(line, &entry.name)?;
        if entry.negated {
            cell.clears.push(resolved.objects());
            continue;
        }

        // Outer `None`: no movement written. `Some(None)`: `stationary`.
        let written = entry
            .movement
            .map(|keyword| absolute(keyword, direction));
        let concrete = match resolved {
            LegendEntry::Object(id) => vec![Some(*id)],
            LegendEntry::Aggregate(ids) => ids.iter().copied().map(Some).collect(),
            LegendEntry::Property(_) => vec![None],
        };
        for object in concrete {
            let objects = object.map_or_else(|| resolved.objects(), ObjectSet::single);
            let partner = claims
                .iter()
                .position(|claim| !claim.claimed && claim.objects == objects);
            match partner {
                Some(index) => {
                    claims[index].claimed = true;
                    let requirement = &mut cell.requirements[index];
                    let write = match written {
                        Some(Some(movement)) => MovementWrite::Set(movement),
                        Some(None) => MovementWrite::Clear,
                        None if requirement.movement.is_constrained() => MovementWrite::Clear,
                        None => MovementWrite::Unchanged,
                    };
                    requirement.outcome = Outcome::Keep(write);
                }
                None => {
                    let object = object.ok_or_else(|| CompileError::UnboundProperty {
                        line,
                        name: entry.name.clone(),
                    })?;
                    cell.spawns.push(Spawn {
                        object,
                        movement: written.flatten(),
                    });
                }
            }
        }
    }

    Ok(cell)
}

#[cfg(test)]
mod tests {
    use puzzle_core::{NullLogger, ObjectId};

    use super::*;
    use crate::parser::Parser;

    const PLAYER: ObjectId = ObjectId(1);
    const CRATE: ObjectId = ObjectId(2);

    fn compile(rules: &str) -> Result<Vec<RuleGroup>, CompileError> {
        let text = format!(
            "OBJECTS\nBackground\n\nPlayer\n\nCrate\n\nWall\n\n\
             LEGEND\nHero = Player\nSolid = Crate or Wall\nPile = Crate and Wall\n\n\
             COLLISIONLAYERS\nBackground\nPlayer, Crate\nWall\n\nRULES\n{rules}\n"
        );
        let parsed = Parser::new(&NullLogger).parse(&text).unwrap();
        let symbols = Symbols::build(&parsed, &NullLogger).unwrap();
        compile_rules(&parsed.rules, &symbols)
    }

    #[test]
    fn expands_in_canonical_direction_order() {
        let groups = compile("[ > Player | Crate ] -> [ > Player | > Crate ]").unwrap();
        let rules = &groups[0].rules;

        let directions: Vec<_> = rules.iter().map(|rule| rule.direction).collect();
        assert_eq!(directions, Direction::ALL.to_vec());
        assert!(rules.iter().all(|rule| rule.line == rules[0].line));

        let left = &rules[2];
        assert_eq!(
            left.cells[0].requirements[0].movement,
            MovementMatch::Exactly(Movement::Left)
        );
        assert_eq!(
            left.cells[1].requirements[0].outcome,
            Outcome::Keep(MovementWrite::Set(Movement::Left))
        );
    }

    #[test]
    fn relative_movements_rotate_with_the_rule() {
        let groups = compile("right [ ^ Player | v Crate ] -> [ ^ Player | v Crate ]").unwrap();
        let rule = &groups[0].rules[0];
        assert_eq!(rule.direction, Direction::Right);
        assert_eq!(
            rule.cells[0].requirements[0].movement,
            MovementMatch::Exactly(Movement::Up)
        );
        assert_eq!(
            rule.cells[1].requirements[0].movement,
            MovementMatch::Exactly(Movement::Down)
        );
    }

    #[test]
    fn pairs_entries_by_object() {
        let groups =
            compile("right [ > Player | Crate | no Solid ] -> [ | Player | Crate ]").unwrap();
        let cells = &groups[0].rules[0].cells;

        assert_eq!(cells[0].requirements[0].outcome, Outcome::Remove);
        assert!(cells[0].spawns.is_empty());

        assert_eq!(cells[1].requirements[0].outcome, Outcome::Remove);
        assert_eq!(
            cells[1].spawns,
            vec![Spawn {
                object: PLAYER,
                movement: None,
            }]
        );

        assert_eq!(cells[2].exclusions.len(), 1);
        assert_eq!(cells[2].exclusions[0].objects.len(), 2);
        assert_eq!(
            cells[2].spawns,
            vec![Spawn {
                object: CRATE,
                movement: None,
            }]
        );
    }

    #[test]
    fn aliases_pair_with_the_object_they_name() {
        let groups = compile("[ > Player | Crate ] -> [ Hero | CRATE ]").unwrap();
        let cells = &groups[0].rules[0].cells;

        assert_eq!(
            cells[0].requirements[0].outcome,
            Outcome::Keep(MovementWrite::Clear)
        );
        assert_eq!(
            cells[1].requirements[0].outcome,
            Outcome::Keep(MovementWrite::Unchanged)
        );
        assert!(cells.iter().all(|cell| cell.spawns.is_empty()));
    }

    #[test]
    fn kept_objects_lose_constrained_movement() {
        let groups =
            compile("[ > Player ] -> [ Player ]\n[ Solid ] -> [ stationary Solid ]").unwrap();

        let kept = &groups[0].rules[0].cells[0].requirements[0];
        assert_eq!(kept.outcome, Outcome::Keep(MovementWrite::Clear));
        let kept = &groups[1].rules[0].cells[0].requirements[0];
        assert_eq!(kept.outcome, Outcome::Keep(MovementWrite::Clear));
    }

    #[test]
    fn single_cell_expansions_are_deduplicated() {
        let groups = compile("[ Crate ] -> [ Wall ]\n[ > Player ] -> [ Player ]").unwrap();
        assert_eq!(groups[0].rules.len(), 1);
        assert_eq!(groups[1].rules.len(), 4);
    }

    #[test]
    fn aggregates_and_groups() {
        let groups =
            compile("[ Pile ] -> [ Pile ]\n+ [ Player ] -> [ Player Pile ]\n[ Player ] -> win")
                .unwrap();

        assert_eq!(groups.len(), 2);
        let first = &groups[0].rules[0].cells[0];
        assert_eq!(first.requirements.len(), 2);
        assert!(
            first
                .requirements
                .iter()
                .all(|r| r.outcome == Outcome::Keep(MovementWrite::Unchanged))
        );
        assert_eq!(groups[0].rules[1].cells[0].spawns.len(), 2);

        let win = &groups[1].rules[0];
        assert_eq!(win.commands, RuleCommands::WIN);
        assert_eq!(
            win.cells[0].requirements[0].outcome,
            Outcome::Keep(MovementWrite::Unchanged)
        );
    }

    #[test]
    fn rejects_malformed_rules() {
        assert!(matches!(
            compile("[ Player | Crate ] -> [ Player ]"),
            Err(CompileError::CellCountMismatch { lhs: 2, rhs: 1, .. })
        ));
        assert!(matches!(
            compile("[ Player ] ->"),
            Err(CompileError::RuleWithoutEffect { .. })
        ));
        assert!(matches!(
            compile("[ Player ] -> [ Solid ]"),
            Err(CompileError::UnboundProperty { name, .. }) if name == "Solid"
        ));
        assert!(matches!(
            compile("[ Ghost ] -> [ ]"),
            Err(CompileError::UndefinedName { name, .. }) if name == "Ghost"
        ));
    }
}
