//! Compiles a [`ParsedGame`] into an executable [`CompiledGame`].
//!
//! Compilation runs in dependency order: objects and the legend, collision
//! layers, rules, win conditions, then levels. The first inconsistency stops
//! it; a game is either compiled completely or not at all.
mod error;
mod graphics;
mod levels;
mod rules;
mod symbols;

use puzzle_core::{CompiledGame, GameMetadata, Logger, WinCondition};

pub use error::CompileError;

use crate::parser::{MetadataEntry, ParsedGame, WinLine};
use symbols::Symbols;

pub struct Compiler<'a> {
    logger: &'a dyn Logger,
}

impl<'a> Compiler<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self { logger }
    }

    /// Compiles `parsed`, logging the failure and returning `None` if the
    /// game is inconsistent.
    pub fn compile_game(&self, parsed: &ParsedGame) -> Option<CompiledGame> {
        match self.compile(parsed) {
            Ok(game) => Some(game),
            Err(err) => {
                self.logger.error(&format!("compile error: {err}"));
                None
            }
        }
    }

    pub fn compile(&self, parsed: &ParsedGame) -> Result<CompiledGame, CompileError> {
        let metadata = compile_metadata(&parsed.metadata);
        let symbols = Symbols::build(parsed, self.logger)?;

        let player = symbols
            .legend
            .get("player")
            .map(|entry| entry.objects())
            .filter(|set| !set.is_empty())
            .ok_or(CompileError::MissingPlayer)?;

        let rule_groups = rules::compile_rules(&parsed.rules, &symbols)?;
        let win_conditions = parsed
            .win_conditions
            .iter()
            .map(|line| compile_win_condition(line, &symbols))
            .collect::<Result<Vec<_>, _>>()?;
        let levels = levels::compile_levels(&parsed.levels, &symbols)?;

        if levels.is_empty() {
            self.logger.warning("game defines no levels");
        }

        Ok(CompiledGame {
            metadata,
            objects: symbols.objects,
            layer_count: symbols.layer_count,
            legend: symbols.legend,
            player,
            rule_groups,
            win_conditions,
            levels,
        })
    }
}

fn compile_metadata(entries: &[MetadataEntry]) -> GameMetadata {
    let mut metadata = GameMetadata::default();
    for entry in entries {
        match entry.key.as_str() {
            "title" => metadata.title = entry.value.clone(),
            "author" => metadata.author = entry.value.clone(),
            "homepage" => metadata.homepage = entry.value.clone(),
            "noundo" => metadata.noundo = true,
            "norestart" => metadata.norestart = true,
            "run_rules_on_level_start" => metadata.run_rules_on_level_start = true,
            _ => {
                metadata
                    .extra
                    .insert(entry.key.clone(), entry.value.clone().unwrap_or_default());
            }
        }
    }
    metadata
}

fn compile_win_condition(line: &WinLine, symbols: &Symbols) -> Result<WinCondition, CompileError> {
    let subject = symbols.resolve(line.line, &line.subject)?.objects();
    let target = line
        .target
        .as_deref()
        .map(|name| symbols.resolve(line.line, name).map(|entry| entry.objects()))
        .transpose()?;

    Ok(WinCondition {
        line: line.line,
        quantifier: line.quantifier,
        subject,
        target,
    })
}
