//! Deterministic core of the puzzle engine.
//!
//! `puzzle-core` defines the compiled game model (objects, layers, rules, win
//! conditions), the mutable level board and the turn engine that rewrites it.
//! Every board change made during a turn is recorded as a delta so that it can
//! be reported and reverted exactly. Parsing and compilation live in
//! `puzzle-content`; session management lives in `puzzle-runtime`.
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logger;
pub mod state;

pub use config::EngineConfig;
pub use engine::{InputType, TurnEngine, TurnOutcome};
pub use error::InvariantViolation;
pub use game::{
    CellRule, Color, CompiledGame, DirectionSet, Exclusion, GameMetadata, LayerId, LegendEntry,
    MovementMatch, MovementWrite, ObjectDef, ObjectGraphics, ObjectId, ObjectSet, Outcome,
    Quantifier, Requirement, Rule, RuleCommands, RuleGroup, Spawn, WinCondition, is_won,
};
pub use logger::{LogLevel, LogRecord, Logger, MemoryLogger, NullLogger};
pub use state::{
    Cell, CellDelta, Direction, Level, Movement, ObjectDelta, ObjectDeltaKind, Occupant, Position,
    RuleDelta, SubturnHistory, TurnRecord, revert_turn,
};
