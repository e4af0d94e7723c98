//! Game session state machine.
//!
//! A [`Runtime`] holds at most one compiled game and the level being played,
//! runs turns on input and keeps the undo stack. Calls are synchronous: a turn
//! is complete, deltas and win check included, by the time a call returns.

use std::str::FromStr;
use std::sync::Arc;

use puzzle_content::{Compiler, Parser};
use puzzle_core::{
    CompiledGame, EngineConfig, InputType, Level, Logger, SubturnHistory, TurnEngine, TurnOutcome,
    is_won, revert_turn,
};
use serde::{Deserialize, Serialize};

use crate::api::{InputCommand, LevelState, Result, RuntimeError, SubturnReport, turn_report};
use crate::history::UndoHistory;
use crate::logging::TracingLogger;

/// Runtime configuration shared by the session and its turn engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Undoable turns kept per level; `None` keeps every one.
    pub undo_limit: Option<usize>,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_max_rewrites_per_group(mut self, max_rewrites_per_group: usize) -> Self {
        self.engine = EngineConfig::with_max_rewrites_per_group(max_rewrites_per_group);
        self
    }

    pub fn with_undo_limit(mut self, undo_limit: usize) -> Self {
        self.undo_limit = Some(undo_limit);
        self
    }
}

/// Where the session stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No game, or a game without levels.
    Uninitialized,
    LevelLoaded(usize),
    /// Input is ignored until undo, restart or another level.
    LevelWon(usize),
}

impl Phase {
    pub fn level(self) -> Option<usize> {
        match self {
            Phase::Uninitialized => None,
            Phase::LevelLoaded(index) | Phase::LevelWon(index) => Some(index),
        }
    }
}

/// Single-player puzzle session.
///
/// Owns the compiled game, the current [`Level`] and its undo stack. Hosts
/// that want several sessions run several runtimes; nothing here is shared.
pub struct Runtime {
    config: RuntimeConfig,
    logger: Arc<dyn Logger>,
    game: Option<CompiledGame>,
    level: Option<Level>,
    phase: Phase,
    history: UndoHistory,
    /// Deltas of the most recent turn, including a level-start turn.
    turn_deltas: Vec<SubturnHistory>,
    turns: u64,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Runtime with default configuration reporting to `logger`.
    pub fn new(logger: impl Logger + 'static) -> Self {
        Self::builder().logger(logger).build()
    }

    /// Parses and compiles `source`, then starts its first level.
    ///
    /// On failure the error is logged and returned, and the previously loaded
    /// game, level and undo stack are left exactly as they were.
    pub fn load_game(&mut self, source: &str) -> Result<()> {
        let game = self
            .compile_source(source)
            .inspect_err(|err| self.logger.error(&format!("failed to load game: {err}")))?;
        self.load_compiled_game(game);
        Ok(())
    }

    /// Replaces the session's game. The first level is started if there is
    /// one; otherwise the runtime stays [`Phase::Uninitialized`].
    pub fn load_compiled_game(&mut self, game: CompiledGame) {
        tracing::debug!(
            target: "puzzle",
            title = game.metadata.title.as_deref().unwrap_or_default(),
            objects = game.objects.len(),
            rules = game.rule_count(),
            levels = game.level_count(),
            "game loaded"
        );

        let has_levels = game.level_count() > 0;
        self.game = Some(game);
        self.level = None;
        self.phase = Phase::Uninitialized;
        self.history.clear();
        self.turn_deltas.clear();

        if !has_levels {
            self.logger.warning("game has no levels to play");
            return;
        }
        let started = self.enter_level(0);
        debug_assert!(started.is_ok(), "first level failed to start: {started:?}");
        if let Err(err) = started {
            self.logger.error(&format!("cannot start the first level: {err}"));
        }
    }

    /// Starts level `index` afresh, dropping its undo history.
    pub fn load_level(&mut self, index: usize) -> Result<()> {
        if self.game.is_none() {
            self.logger
                .error(&format!("cannot load level {index}: no game loaded"));
            return Err(RuntimeError::NoGameLoaded);
        }
        self.enter_level(index)
    }

    /// Starts the current level afresh.
    pub fn restart_level(&mut self) -> Result<()> {
        let index = self.phase.level().ok_or(RuntimeError::NoGameLoaded)?;
        if self.metadata_flag(|game| game.metadata.norestart) {
            self.logger.info("restart ignored: disabled by this game");
            return Err(RuntimeError::RestartDisabled);
        }
        self.enter_level(index)
    }

    /// Runs one turn for `input`.
    ///
    /// Returns whether the board changed. Without a level the input is
    /// refused with [`RuntimeError::NoGameLoaded`]; on a won level it is
    /// ignored.
    pub fn receive_input(&mut self, input: InputType) -> Result<bool> {
        let index = match self.phase {
            Phase::LevelLoaded(index) => index,
            Phase::LevelWon(_) => {
                self.logger
                    .info(&format!("input `{input}` ignored: level already complete"));
                return Ok(false);
            }
            Phase::Uninitialized => return Err(RuntimeError::NoGameLoaded),
        };
        let (Some(game), Some(level)) = (self.game.as_ref(), self.level.as_mut()) else {
            return Err(RuntimeError::NoGameLoaded);
        };

        self.turns += 1;
        let outcome = TurnEngine::new(game, level, &self.config.engine).run_turn(Some(input));
        log_outcome(self.logger.as_ref(), &self.config.engine, &outcome);

        let won =
            !outcome.cancelled && (outcome.win_requested || is_won(&game.win_conditions, level));
        let changed = !outcome.record.is_noop();
        tracing::debug!(
            target: "puzzle",
            turn = self.turns,
            %input,
            subturns = outcome.record.subturns.len(),
            rules = outcome.record.rule_count(),
            cancelled = outcome.cancelled,
            won,
            "turn complete"
        );

        self.turn_deltas = outcome.record.subturns.clone();
        self.history.push(outcome.record, won);
        if won {
            self.phase = Phase::LevelWon(index);
            self.logger.info(&format!("level {index} complete"));
        }
        Ok(changed)
    }

    /// Dispatches a host token: a move, `undo` or `restart`.
    ///
    /// Unknown tokens are logged and refused; nothing else happens.
    pub fn send_input(&mut self, token: &str) -> Result<bool> {
        let command = InputCommand::from_str(token.trim()).map_err(|_| {
            let err = RuntimeError::UnknownInput(token.to_owned());
            self.logger.error(&err.to_string());
            err
        })?;

        match (command, command.input()) {
            (_, Some(input)) => self.receive_input(input),
            (InputCommand::Undo, None) => self.undo(),
            (_, None) => self.restart_level().map(|()| true),
        }
    }

    /// Reverts the most recent undoable turn.
    ///
    /// Returns `false` when there is nothing to undo. Undoing the winning
    /// turn reopens the level.
    pub fn undo(&mut self) -> Result<bool> {
        let index = self.phase.level().ok_or(RuntimeError::NoGameLoaded)?;
        if self.metadata_flag(|game| game.metadata.noundo) {
            self.logger.info("undo ignored: disabled by this game");
            return Err(RuntimeError::UndoDisabled);
        }
        let (Some(game), Some(level)) = (self.game.as_ref(), self.level.as_mut()) else {
            return Err(RuntimeError::NoGameLoaded);
        };
        let Some(record) = self.history.pop() else {
            return Ok(false);
        };

        let violations = revert_turn(level, game, &record.subturns);
        debug_assert!(violations.is_empty(), "undo was inconsistent: {violations:?}");
        for violation in &violations {
            self.logger
                .error(&format!("undo skipped an inconsistent delta: {violation}"));
        }
        tracing::debug!(
            target: "puzzle",
            rules = record.rule_count(),
            remaining = self.history.len(),
            "turn undone"
        );

        self.turn_deltas.clear();
        self.phase = Phase::LevelLoaded(index);
        Ok(true)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_count(&self) -> usize {
        self.game.as_ref().map_or(0, CompiledGame::level_count)
    }

    pub fn is_level_complete(&self) -> bool {
        matches!(self.phase, Phase::LevelWon(_))
    }

    pub fn game(&self) -> Option<&CompiledGame> {
        self.game.as_ref()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Snapshot of the current level with object identifiers.
    pub fn level_state(&self) -> Option<LevelState> {
        let (game, level) = (self.game.as_ref()?, self.level.as_ref()?);
        Some(LevelState::capture(level, game))
    }

    /// Deltas of the most recent turn; empty after a no-op turn or an undo.
    pub fn turn_deltas(&self) -> &[SubturnHistory] {
        &self.turn_deltas
    }

    /// [`Runtime::turn_deltas`] resolved for renderers.
    pub fn turn_report(&self) -> Vec<SubturnReport> {
        self.game
            .as_ref()
            .map(|game| turn_report(&self.turn_deltas, game))
            .unwrap_or_default()
    }

    /// SHA-256 digest of the current board.
    pub fn fingerprint(&self) -> Option<[u8; 32]> {
        self.level.as_ref().map(Level::fingerprint)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    fn compile_source(&self, source: &str) -> Result<CompiledGame> {
        let logger = self.logger.as_ref();
        let parsed = Parser::new(logger).parse(source)?;
        Ok(Compiler::new(logger).compile(&parsed)?)
    }

    fn metadata_flag(&self, flag: impl Fn(&CompiledGame) -> bool) -> bool {
        self.game.as_ref().is_some_and(flag)
    }

    fn enter_level(&mut self, index: usize) -> Result<()> {
        let Some(game) = self.game.as_ref() else {
            return Err(RuntimeError::NoGameLoaded);
        };
        let Some(mut level) = game.instantiate_level(index) else {
            let err = RuntimeError::LevelOutOfRange {
                index,
                count: game.level_count(),
            };
            self.logger.error(&format!("cannot load level: {err}"));
            return Err(err);
        };

        let mut turn_deltas = Vec::new();
        if game.metadata.run_rules_on_level_start {
            let outcome = TurnEngine::new(game, &mut level, &self.config.engine).run_turn(None);
            log_outcome(self.logger.as_ref(), &self.config.engine, &outcome);
            turn_deltas = outcome.record.subturns;
        }
        tracing::debug!(
            target: "puzzle",
            level = index,
            width = level.width,
            height = level.height,
            "level started"
        );

        self.level = Some(level);
        self.phase = Phase::LevelLoaded(index);
        self.history.clear();
        self.turn_deltas = turn_deltas;
        Ok(())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn log_outcome(logger: &dyn Logger, engine: &EngineConfig, outcome: &TurnOutcome) {
    for group in &outcome.saturated_groups {
        logger.warning(&format!(
            "rule group {group} stopped after {} rewrites",
            engine.max_rewrites_per_group
        ));
    }
    debug_assert!(
        outcome.violations.is_empty(),
        "turn was inconsistent: {:?}",
        outcome.violations
    );
    for violation in &outcome.violations {
        logger.error(&format!("turn skipped an inconsistent delta: {violation}"));
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    logger: Option<Arc<dyn Logger>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            logger: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Diagnostic sink; defaults to [`TracingLogger`].
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    pub fn undo_limit(mut self, undo_limit: usize) -> Self {
        self.config.undo_limit = Some(undo_limit);
        self
    }

    pub fn max_rewrites_per_group(mut self, max_rewrites_per_group: usize) -> Self {
        self.config.engine = EngineConfig::with_max_rewrites_per_group(max_rewrites_per_group);
        self
    }

    pub fn build(self) -> Runtime {
        Runtime {
            history: UndoHistory::new(self.config.undo_limit),
            config: self.config,
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            game: None,
            level: None,
            phase: Phase::Uninitialized,
            turn_deltas: Vec::new(),
            turns: 0,
        }
    }
}
