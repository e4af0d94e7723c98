use super::ast::Section;

/// Syntax error with the 1-based line it was found on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("comment is never closed")]
    UnclosedComment,

    #[error("unknown section `{0}`")]
    UnknownSection(String),

    #[error("section {0} declared twice")]
    DuplicateSection(Section),

    #[error("legend line needs the form `symbol = definition`")]
    MalformedLegend,

    #[error("legend line mixes `and` and `or`")]
    MixedLegendOperators,

    #[error("rule needs a `[` pattern")]
    MissingPattern,

    #[error("pattern is not closed with `]`")]
    UnterminatedPattern,

    #[error("rule is missing `->`")]
    MissingArrow,

    #[error("only one pattern is allowed on each side of a rule")]
    MultiplePatterns,

    #[error("unexpected `{0}` in rule")]
    UnexpectedToken(String),

    #[error("unknown rule prefix `{0}`")]
    UnknownRulePrefix(String),

    #[error("unknown rule command `{0}`")]
    UnknownCommand(String),

    #[error("unknown win quantifier `{0}`")]
    UnknownQuantifier(String),

    #[error("win condition needs the form `quantifier name [on name]`")]
    MalformedWinCondition,

    #[error("`all` win condition needs an `on` target")]
    MissingWinTarget,
}
