//! Error type surfaced by the runtime API.
//!
//! Content failures keep their stage's typed error so hosts can show the
//! offending line; the remaining variants describe calls the runtime refused.
use puzzle_content::{CompileError, ParseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("no level is loaded")]
    NoGameLoaded,

    #[error("level {index} does not exist (game has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },

    #[error("unknown input `{0}`")]
    UnknownInput(String),

    #[error("undo is disabled for this game")]
    UndoDisabled,

    #[error("restart is disabled for this game")]
    RestartDisabled,
}
