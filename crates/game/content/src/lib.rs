//! Game document parsing and compilation.
//!
//! The [`Parser`] turns document text into a syntactic [`ParsedGame`]; the
//! [`Compiler`] resolves names, layers, rules and levels into the immutable
//! [`puzzle_core::CompiledGame`] the engine runs. Both stages report through
//! an injected [`puzzle_core::Logger`] and never panic on bad input.
//!
//! # Document format
//!
//! ```text
//! title Sokoban
//!
//! OBJECTS
//! Background
//! black
//!
//! Player
//! blue
//! .000.
//! .000.
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
//! (comments may appear anywhere)
//! [ > Player | no Player ] -> [ | Player ]
//!
//! WINCONDITIONS
//! some Player
//!
//! LEVELS
//! P..
//! ```
pub mod compiler;
pub mod parser;

pub use compiler::{CompileError, Compiler};
pub use parser::{ParseError, ParseErrorKind, ParsedGame, Parser};
