//! Game document parser.
//!
//! Turns document text into a [`ParsedGame`]: comments are stripped, lines
//! are split into sections by their headers, and each section is read with
//! its own line grammar. Nothing is resolved here; an unknown object name in
//! a rule is the compiler's problem, not a syntax error.
pub mod ast;
mod error;
mod lexer;
mod rules;
mod sections;

use std::str::FromStr;

use puzzle_core::Logger;

pub use ast::{
    CommandKeyword, LayerLine, LegendKind, LegendLine, LevelBlock, MetadataEntry,
    MovementKeyword, ObjectBlock, ParsedGame, PatternCell, PatternEntry, RuleDirection, RuleLine,
    Section, WinLine,
};
pub use error::{ParseError, ParseErrorKind};

use lexer::SourceLine;

/// Lines between two headers; `section == None` is the prelude.
struct Chunk<'a> {
    section: Option<Section>,
    lines: Vec<&'a SourceLine>,
}

/// True when the lines right above and below are separators, the way a
/// section banner is written.
fn framed_by_separators(lines: &[SourceLine], index: usize) -> bool {
    let above = index.checked_sub(1).and_then(|at| lines.get(at));
    let below = lines.get(index + 1);
    above.is_some_and(SourceLine::is_separator) && below.is_some_and(SourceLine::is_separator)
}

pub struct Parser<'a> {
    logger: &'a dyn Logger,
}

impl<'a> Parser<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self { logger }
    }

    /// Parses `text`, logging the failure and returning `None` on a syntax
    /// error.
    pub fn parse_from_string(text: &str, logger: &dyn Logger) -> Option<ParsedGame> {
        match Parser::new(logger).parse(text) {
            Ok(game) => Some(game),
            Err(err) => {
                logger.error(&format!("parse error: {err}"));
                None
            }
        }
    }

    pub fn parse(&self, text: &str) -> Result<ParsedGame, ParseError> {
        let lines = lexer::lex(text)?;
        let chunks = split_sections(&lines)?;

        let mut game = ParsedGame::default();
        for chunk in chunks {
            self.read_chunk(chunk, &mut game)?;
        }
        Ok(game)
    }

    fn read_chunk(&self, chunk: Chunk<'_>, game: &mut ParsedGame) -> Result<(), ParseError> {
        let content = || chunk.lines.iter().copied().filter(|line| !line.is_blank());

        match chunk.section {
            None => game.metadata = sections::parse_metadata(&chunk.lines),
            Some(Section::Objects) => game.objects = sections::parse_objects(&chunk.lines),
            Some(Section::Legend) => {
                game.legend = content()
                    .map(sections::parse_legend_line)
                    .collect::<Result<_, _>>()?;
            }
            Some(Section::Sounds) => {}
            Some(Section::CollisionLayers) => {
                game.layers = content().map(sections::parse_layer_line).collect();
            }
            Some(Section::Rules) => {
                game.rules = content()
                    .map(|line| rules::parse_rule(line.number, &line.text))
                    .collect::<Result<_, _>>()?;
            }
            Some(Section::WinConditions) => {
                game.win_conditions = content()
                    .map(sections::parse_win_line)
                    .collect::<Result<_, _>>()?;
            }
            Some(Section::Levels) => {
                game.levels = sections::parse_levels(&chunk.lines, self.logger);
            }
        }
        Ok(())
    }
}

fn split_sections(lines: &[SourceLine]) -> Result<Vec<Chunk<'_>>, ParseError> {
    let mut chunks = vec![Chunk {
        section: None,
        lines: Vec::new(),
    }];
    let mut seen: Vec<Section> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.is_separator() {
            continue;
        }
        if let Ok(section) = Section::from_str(&line.text) {
            if seen.contains(&section) {
                return Err(ParseError::new(
                    line.number,
                    ParseErrorKind::DuplicateSection(section),
                ));
            }
            seen.push(section);
            chunks.push(Chunk {
                section: Some(section),
                lines: Vec::new(),
            });
            continue;
        }
        if framed_by_separators(lines, index) {
            return Err(ParseError::new(
                line.number,
                ParseErrorKind::UnknownSection(line.text.clone()),
            ));
        }
        if let Some(chunk) = chunks.last_mut() {
            chunk.lines.push(line);
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use puzzle_core::{LogLevel, MemoryLogger, NullLogger};

    use super::*;

    const SOKOBAN: &str = "\
title Tiny Push
author someone
noundo

========
OBJECTS
========

Background
black

Player
blue

Crate
orange

=======
LEGEND
=======

. = Background
P = Player
* = Crate

======
SOUNDS
======

sfx0 1234

================
COLLISIONLAYERS
================

Background
Player, Crate

======
RULES
======

(push)
[ > Player | Crate ] -> [ > Player | > Crate ]
+ [ > Crate | no Crate ] -> [ | Crate ]

==============
WINCONDITIONS
==============

some Player

=======
LEVELS
=======

P*.

message the end
";

    #[test]
    fn parses_every_section() {
        let game = Parser::new(&NullLogger).parse(SOKOBAN).unwrap();

        let keys: Vec<_> = game.metadata.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["title", "author", "noundo"]);
        assert_eq!(game.metadata[0].value.as_deref(), Some("Tiny Push"));
        assert_eq!(game.objects.len(), 3);
        assert_eq!(game.legend.len(), 3);
        assert_eq!(game.layers.len(), 2);
        assert_eq!(game.layers[1].names, vec!["Player", "Crate"]);
        assert_eq!(game.rules.len(), 2);
        assert_eq!(game.rules[0].line, 44);
        assert!(game.rules[1].joins_previous);
        assert_eq!(game.win_conditions.len(), 1);
        assert_eq!(game.levels.len(), 1);
        assert_eq!(game.levels[0].rows, vec!["P*."]);
    }

    #[test]
    fn headers_are_case_insensitive() {
        let game = Parser::new(&NullLogger)
            .parse("objects\nPlayer\n\nLegend\nP = Player\n")
            .unwrap();
        assert_eq!(game.objects.len(), 1);
        assert_eq!(game.legend[0].symbol, "P");
    }

    #[test]
    fn unknown_and_duplicate_sections() {
        let parser = Parser::new(&NullLogger);

        let err = parser.parse("OBJECTS\nPlayer\n\n=====\nSCRIPTS\n=====\n").unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.kind, ParseErrorKind::UnknownSection("SCRIPTS".into()));

        let err = parser.parse("RULES\nrules\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::DuplicateSection(Section::Rules));
    }

    #[test]
    fn failures_are_logged_with_the_line() {
        let logger = MemoryLogger::new();
        let text = "RULES\n\n[ > Player | Crate -> [ Player ]\n";

        assert!(Parser::parse_from_string(text, &logger).is_none());
        let errors = logger.at(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("line 3"));
    }
}
