/// Semantic error in a syntactically valid document.
///
/// Variants carry the 1-based source line of the offending declaration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("line {line}: `{name}` is already defined")]
    DuplicateName { line: usize, name: String },

    #[error("line {line}: `{name}` is not defined")]
    UndefinedName { line: usize, name: String },

    #[error("line {line}: property `{symbol}` cannot contain aggregate `{name}`")]
    PropertyContainsAggregate {
        line: usize,
        symbol: String,
        name: String,
    },

    #[error("line {line}: aggregate `{symbol}` cannot contain property `{name}`")]
    AggregateContainsProperty {
        line: usize,
        symbol: String,
        name: String,
    },

    #[error("more than {max} objects")]
    TooManyObjects { max: usize },

    #[error("more than {max} collision layers")]
    TooManyLayers { max: usize },

    #[error("line {line}: object `{name}` is listed in more than one collision layer")]
    MultipleLayers { line: usize, name: String },

    #[error("line {line}: object `{name}` has no collision layer")]
    MissingLayer { line: usize, name: String },

    #[error("no `player` object or property is defined")]
    MissingPlayer,

    #[error("line {line}: rule has neither a right-hand side nor a command")]
    RuleWithoutEffect { line: usize },

    #[error("line {line}: left side has {lhs} cells but right side has {rhs}")]
    CellCountMismatch { line: usize, lhs: usize, rhs: usize },

    #[error("line {line}: property `{name}` on the right side is not bound on the left side")]
    UnboundProperty { line: usize, name: String },

    #[error("line {line}: level rows have different widths")]
    NonRectangularLevel { line: usize },

    #[error("line {line}: `{symbol}` is a property and cannot be placed in a level")]
    AmbiguousLevelSymbol { line: usize, symbol: String },

    #[error("line {line}: `{symbol}` puts two objects on collision layer {layer}")]
    LevelLayerConflict {
        line: usize,
        symbol: String,
        layer: usize,
    },
}
