//! Syntactic model of a game document.
//!
//! Names are kept exactly as written; resolving them against objects and the
//! legend is the compiler's job. Every node carries the 1-based line it was
//! read from.

use puzzle_core::Quantifier;

/// Section headers, matched case-insensitively on a line of their own.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Section {
    #[strum(serialize = "OBJECTS")]
    Objects,
    #[strum(serialize = "LEGEND")]
    Legend,
    #[strum(serialize = "SOUNDS")]
    Sounds,
    #[strum(serialize = "COLLISIONLAYERS")]
    CollisionLayers,
    #[strum(serialize = "RULES")]
    Rules,
    #[strum(serialize = "WINCONDITIONS")]
    WinConditions,
    #[strum(serialize = "LEVELS")]
    Levels,
}

/// Prelude line: a key and whatever follows it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataEntry {
    pub line: usize,
    pub key: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectBlock {
    pub line: usize,
    pub name: String,
    /// Extra symbols written after the name.
    pub glyphs: Vec<String>,
    pub colors: Vec<String>,
    /// Sprite rows, `.` or a palette digit per pixel.
    pub sprite: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendKind {
    /// `sym = name`
    Alias,
    /// `sym = a or b`
    Property,
    /// `sym = a and b`
    Aggregate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegendLine {
    pub line: usize,
    pub symbol: String,
    pub kind: LegendKind,
    pub names: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerLine {
    pub line: usize,
    pub names: Vec<String>,
}

/// Direction keyword written in front of a rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RuleDirection {
    Up,
    Down,
    Left,
    Right,
    Horizontal,
    Vertical,
    Orthogonal,
}

/// Movement modifier in front of a pattern entry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MovementKeyword {
    /// Along the rule direction.
    #[strum(serialize = ">")]
    Forward,
    #[strum(serialize = "<")]
    Backward,
    /// Rule direction turned counter-clockwise.
    #[strum(serialize = "^")]
    TurnLeft,
    /// Rule direction turned clockwise.
    #[strum(serialize = "v")]
    TurnRight,
    Up,
    Down,
    Left,
    Right,
    Action,
    Stationary,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandKeyword {
    Cancel,
    Win,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternEntry {
    pub negated: bool,
    pub movement: Option<MovementKeyword>,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternCell {
    pub entries: Vec<PatternEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleLine {
    pub line: usize,
    /// Written with a leading `+`.
    pub joins_previous: bool,
    pub directions: Vec<RuleDirection>,
    pub lhs: Vec<PatternCell>,
    /// `None` for command-only rules such as `[ Player Goal ] -> win`.
    pub rhs: Option<Vec<PatternCell>>,
    pub commands: Vec<CommandKeyword>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinLine {
    pub line: usize,
    pub quantifier: Quantifier,
    pub subject: String,
    pub target: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelBlock {
    /// Line of the first row.
    pub line: usize,
    pub rows: Vec<String>,
}

/// Raw, unresolved contents of a game document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedGame {
    pub metadata: Vec<MetadataEntry>,
    pub objects: Vec<ObjectBlock>,
    pub legend: Vec<LegendLine>,
    pub layers: Vec<LayerLine>,
    pub rules: Vec<RuleLine>,
    pub win_conditions: Vec<WinLine>,
    pub levels: Vec<LevelBlock>,
}
