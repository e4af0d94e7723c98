//! Session runtime for compiled puzzle games.
//!
//! This crate turns the parser, compiler and turn engine into a playable
//! session: it loads game documents, keeps the current level and its undo
//! stack, accepts host input tokens and exposes board snapshots and turn
//! deltas in a renderer-friendly form.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session state machine and its builder
//! - [`api`] exposes the types hosts exchange with the runtime
//! - [`history`] keeps undoable turns
//! - [`logging`] forwards diagnostics to `tracing`
//!
//! ```
//! use puzzle_runtime::{Phase, Runtime};
//!
//! let source = "\
//! OBJECTS
//! Background
//!
//! Player
//!
//! LEGEND
//! . = Background
//! P = Player
//!
//! COLLISIONLAYERS
//! Background
//! Player
//!
//! RULES
//! [ > Player | ] -> [ | Player ]
//!
//! LEVELS
//! P.
//! ";
//!
//! let mut runtime = Runtime::default();
//! runtime.load_game(source)?;
//! assert_eq!(runtime.phase(), Phase::LevelLoaded(0));
//!
//! assert!(runtime.send_input("right")?);
//! let state = runtime.level_state().unwrap();
//! assert!(state.has(1, 0, "Player"));
//! # Ok::<(), puzzle_runtime::RuntimeError>(())
//! ```
pub mod api;
pub mod history;
pub mod logging;
pub mod runtime;

pub use api::{
    CellReport, CellState, InputCommand, LevelState, ObjectReport, Result, RuleReport,
    RuntimeError, SubturnReport, turn_report,
};
pub use history::UndoHistory;
pub use logging::TracingLogger;
pub use runtime::{Phase, Runtime, RuntimeBuilder, RuntimeConfig};
