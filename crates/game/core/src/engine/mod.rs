//! Turn execution.
//!
//! The [`TurnEngine`] is the only writer of a [`Level`] during a turn. A turn
//! marks the player objects with the input's movement, then runs every rule
//! group in declaration order. Inside a group the board is scanned in raster
//! order, trying the group's rules at each position; the first match that
//! changes the board is applied and the scan restarts from the top-left. The
//! group is done when a full scan applies nothing. All rewriting is iterative
//! so stack depth does not depend on the rule set.
mod input;
mod matcher;

pub use input::InputType;

use crate::config::EngineConfig;
use crate::error::InvariantViolation;
use crate::game::{CompiledGame, RuleCommands, RuleGroup};
use crate::state::{Level, Movement, RuleDelta, SubturnHistory, TurnRecord, revert_turn};

/// Everything a turn produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub record: TurnRecord,
    /// A `cancel` rule matched; the board was restored and `record` is empty.
    pub cancelled: bool,
    /// A `win` rule matched.
    pub win_requested: bool,
    /// Groups cut short by [`EngineConfig::max_rewrites_per_group`].
    pub saturated_groups: Vec<usize>,
    /// Defects met while rolling back a cancelled turn.
    pub violations: Vec<InvariantViolation>,
}

enum Scan {
    Fired(RuleDelta),
    Cancelled,
    Settled,
}

struct GroupRun {
    steps: Vec<RuleDelta>,
    cancelled: bool,
    saturated: bool,
}

/// Runs turns of one compiled game against one board.
pub struct TurnEngine<'a> {
    game: &'a CompiledGame,
    level: &'a mut Level,
    config: &'a EngineConfig,
}

impl<'a> TurnEngine<'a> {
    pub fn new(game: &'a CompiledGame, level: &'a mut Level, config: &'a EngineConfig) -> Self {
        Self {
            game,
            level,
            config,
        }
    }

    /// Runs one full turn. `None` runs the rules without marking the player.
    pub fn run_turn(&mut self, input: Option<InputType>) -> TurnOutcome {
        if let Some(input) = input {
            self.mark_players(input.movement());
        }

        let game = self.game;
        let mut subturns = Vec::new();
        let mut commands = RuleCommands::empty();
        let mut saturated_groups = Vec::new();

        for (index, group) in game.rule_groups.iter().enumerate() {
            let run = self.run_group(group, &mut commands);
            if run.saturated {
                saturated_groups.push(index);
            }
            if !run.steps.is_empty() {
                subturns.push(SubturnHistory { steps: run.steps });
            }
            if run.cancelled {
                let violations = revert_turn(self.level, game, &subturns);
                return TurnOutcome {
                    record: TurnRecord {
                        input,
                        subturns: Vec::new(),
                    },
                    cancelled: true,
                    win_requested: false,
                    saturated_groups,
                    violations,
                };
            }
        }

        self.level.clear_movements();

        TurnOutcome {
            record: TurnRecord { input, subturns },
            cancelled: false,
            win_requested: commands.contains(RuleCommands::WIN),
            saturated_groups,
            violations: Vec::new(),
        }
    }

    fn mark_players(&mut self, movement: Movement) {
        let player = &self.game.player;
        for cell in self.level.cells_mut() {
            for occupant in cell.occupants_mut() {
                if player.contains(occupant.object) {
                    occupant.movement = Some(movement);
                }
            }
        }
    }

    fn run_group(&mut self, group: &RuleGroup, commands: &mut RuleCommands) -> GroupRun {
        let mut run = GroupRun {
            steps: Vec::new(),
            cancelled: false,
            saturated: false,
        };

        loop {
            match self.scan(group, commands) {
                Scan::Fired(step) => {
                    run.steps.push(step);
                    if run.steps.len() >= self.config.max_rewrites_per_group {
                        run.saturated = true;
                        break;
                    }
                }
                Scan::Cancelled => {
                    run.cancelled = true;
                    break;
                }
                Scan::Settled => break,
            }
        }

        run
    }

    /// Applies the first match, in raster order then rule order, that
    /// changes the board.
    fn scan(&mut self, group: &RuleGroup, commands: &mut RuleCommands) -> Scan {
        for origin in self.level.positions() {
            for rule in &group.rules {
                let Some(bindings) = matcher::match_rule(rule, self.level, origin) else {
                    continue;
                };
                if rule.commands.contains(RuleCommands::CANCEL) {
                    return Scan::Cancelled;
                }
                *commands |= rule.commands;

                let cell_deltas =
                    matcher::apply_rule(rule, self.level, self.game, origin, &bindings);
                if !cell_deltas.is_empty() {
                    return Scan::Fired(RuleDelta {
                        rule_line: rule.line,
                        direction: rule.direction,
                        origin,
                        cell_deltas,
                    });
                }
            }
        }
        Scan::Settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        CellRule, GameMetadata, LayerId, MovementMatch, MovementWrite, ObjectDef, ObjectGraphics,
        ObjectId, ObjectSet, Outcome, Requirement, Rule, Spawn,
    };
    use crate::state::{Direction, ObjectDeltaKind, Occupant, Position};

    const PLAYER: ObjectId = ObjectId(0);
    const CRATE: ObjectId = ObjectId(1);

    fn def(id: ObjectId, name: &str) -> ObjectDef {
        ObjectDef {
            id,
            identifier: name.to_owned(),
            layer: LayerId(0),
            aliases: Vec::new(),
            graphics: ObjectGraphics::default(),
        }
    }

    fn requirement(object: ObjectId, movement: MovementMatch, outcome: Outcome) -> Requirement {
        Requirement {
            objects: ObjectSet::single(object),
            movement,
            outcome,
        }
    }

    /// `right [ > Player | ] -> [ | Player ]`
    fn step_rule() -> Rule {
        Rule {
            line: 7,
            direction: Direction::Right,
            cells: vec![
                CellRule {
                    requirements: vec![requirement(
                        PLAYER,
                        MovementMatch::Exactly(Movement::Right),
                        Outcome::Remove,
                    )],
                    ..Default::default()
                },
                CellRule {
                    spawns: vec![Spawn {
                        object: PLAYER,
                        movement: None,
                    }],
                    ..Default::default()
                },
            ],
            commands: RuleCommands::empty(),
        }
    }

    fn game(rules: Vec<Rule>, width: usize) -> CompiledGame {
        let mut level = Level::new(0, width, 1, 1);
        level
            .cell_mut(Position::ORIGIN)
            .unwrap()
            .replace(LayerId(0), Occupant::still(PLAYER));
        CompiledGame {
            metadata: GameMetadata::default(),
            objects: vec![def(PLAYER, "Player"), def(CRATE, "Crate")],
            layer_count: 1,
            legend: Default::default(),
            player: ObjectSet::single(PLAYER),
            rule_groups: vec![RuleGroup { rules }],
            win_conditions: Vec::new(),
            levels: vec![level],
        }
    }

    #[test]
    fn input_drives_a_single_firing() {
        let game = game(vec![step_rule()], 3);
        let mut level = game.instantiate_level(0).unwrap();
        let config = EngineConfig::default();

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(Some(InputType::Right));

        assert!(!outcome.cancelled);
        assert_eq!(outcome.record.subturns.len(), 1);
        let step = &outcome.record.subturns[0].steps[0];
        assert_eq!(step.rule_line, 7);
        assert_eq!(step.origin, Position::ORIGIN);
        assert_eq!(step.cell_deltas.len(), 2);
        assert_eq!(step.cell_deltas[0].deltas[0].kind, ObjectDeltaKind::Disappear);
        assert_eq!(step.cell_deltas[1].deltas[0].kind, ObjectDeltaKind::Appear);
        assert_eq!(level.count(PLAYER), 1);
        assert!(level.cell(Position::new(1, 0)).unwrap().contains(PLAYER));
    }

    #[test]
    fn wrong_input_is_a_noop() {
        let game = game(vec![step_rule()], 3);
        let mut level = game.instantiate_level(0).unwrap();
        let before = level.fingerprint();
        let config = EngineConfig::default();

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(Some(InputType::Left));

        assert!(outcome.record.is_noop());
        assert_eq!(before, level.fingerprint());
    }

    #[test]
    fn cancel_restores_the_board() {
        // Second group: `[ Player ] -> [ Player ] cancel`.
        let mut game = game(vec![step_rule()], 3);
        game.rule_groups.push(RuleGroup {
            rules: vec![Rule {
                line: 9,
                direction: Direction::Up,
                cells: vec![CellRule {
                    requirements: vec![requirement(
                        PLAYER,
                        MovementMatch::Any,
                        Outcome::Keep(MovementWrite::Unchanged),
                    )],
                    ..Default::default()
                }],
                commands: RuleCommands::CANCEL,
            }],
        });
        let mut level = game.instantiate_level(0).unwrap();
        let before = level.fingerprint();
        let config = EngineConfig::default();

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(Some(InputType::Right));

        assert!(outcome.cancelled);
        assert!(outcome.violations.is_empty());
        assert!(outcome.record.subturns.is_empty());
        assert_eq!(before, level.fingerprint());
        assert!(level.cell(Position::ORIGIN).unwrap().contains(PLAYER));
    }

    /// `[ from ] -> [ to ]`, or `[ from ] -> [ ]` without `to`.
    fn swap(from: ObjectId, to: Option<ObjectId>, line: usize) -> Rule {
        Rule {
            line,
            direction: Direction::Up,
            cells: vec![CellRule {
                requirements: vec![requirement(from, MovementMatch::Any, Outcome::Remove)],
                spawns: to
                    .map(|object| Spawn {
                        object,
                        movement: None,
                    })
                    .into_iter()
                    .collect(),
                ..Default::default()
            }],
            commands: RuleCommands::empty(),
        }
    }

    fn origins(subturn: &SubturnHistory) -> Vec<Position> {
        subturn.steps.iter().map(|step| step.origin).collect()
    }

    #[test]
    fn first_declared_rule_wins_at_an_origin() {
        // Declaration order decides, not line numbers.
        let game = game(vec![swap(PLAYER, Some(CRATE), 8), swap(PLAYER, None, 2)], 1);
        let mut level = game.instantiate_level(0).unwrap();
        let config = EngineConfig::default();

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(None);

        let steps = &outcome.record.subturns[0].steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].rule_line, 8);
        assert!(level.cell(Position::ORIGIN).unwrap().contains(CRATE));
    }

    #[test]
    fn earlier_raster_positions_fire_first() {
        let game = game(vec![swap(PLAYER, Some(CRATE), 1)], 3);
        let mut level = game.instantiate_level(0).unwrap();
        level
            .cell_mut(Position::new(2, 0))
            .unwrap()
            .replace(LayerId(0), Occupant::still(PLAYER));

        let config = EngineConfig::with_max_rewrites_per_group(1);
        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(None);
        assert_eq!(origins(&outcome.record.subturns[0]), vec![Position::ORIGIN]);
        assert!(level.cell(Position::new(2, 0)).unwrap().contains(PLAYER));

        let config = EngineConfig::default();
        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(None);
        assert_eq!(origins(&outcome.record.subturns[0]), vec![Position::new(2, 0)]);
        assert_eq!(level.count(CRATE), 2);
    }

    #[test]
    fn later_groups_see_the_settled_board() {
        let mut game = game(vec![swap(PLAYER, Some(CRATE), 1)], 3);
        game.rule_groups.push(RuleGroup {
            rules: vec![swap(CRATE, Some(PLAYER), 2)],
        });
        let mut level = game.instantiate_level(0).unwrap();
        level
            .cell_mut(Position::new(2, 0))
            .unwrap()
            .replace(LayerId(0), Occupant::still(PLAYER));
        let config = EngineConfig::default();

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(None);

        let subturns = &outcome.record.subturns;
        assert_eq!(subturns.len(), 2);
        let both = vec![Position::ORIGIN, Position::new(2, 0)];
        assert_eq!(origins(&subturns[0]), both);
        assert!(subturns[0].steps.iter().all(|step| step.rule_line == 1));
        assert_eq!(origins(&subturns[1]), both);
        assert!(subturns[1].steps.iter().all(|step| step.rule_line == 2));
        assert_eq!(level.count(PLAYER), 2);
        assert_eq!(level.count(CRATE), 0);
    }

    #[test]
    fn oscillating_groups_are_cut_short() {
        let game = game(
            vec![swap(PLAYER, Some(CRATE), 1), swap(CRATE, Some(PLAYER), 2)],
            1,
        );
        let mut level = game.instantiate_level(0).unwrap();
        let config = EngineConfig::with_max_rewrites_per_group(5);

        let outcome = TurnEngine::new(&game, &mut level, &config).run_turn(None);

        assert_eq!(outcome.saturated_groups, vec![0]);
        assert_eq!(outcome.record.rule_count(), 5);
    }
}
