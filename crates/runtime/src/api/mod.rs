//! Types exchanged with runtime hosts.
mod command;
mod errors;
mod report;

pub use command::InputCommand;
pub use errors::{Result, RuntimeError};
pub use report::{
    CellReport, CellState, LevelState, ObjectReport, RuleReport, SubturnReport, turn_report,
};
