use puzzle_core::{Level, LegendEntry, ObjectDef, ObjectId, Occupant, Position};

use super::CompileError;
use super::symbols::Symbols;
use crate::parser::LevelBlock;

pub(crate) fn compile_levels(
    blocks: &[LevelBlock],
    symbols: &Symbols,
) -> Result<Vec<Level>, CompileError> {
    let background = symbols
        .legend
        .get("background")
        .and_then(|entry| match entry {
            LegendEntry::Object(id) => symbols.object(*id),
            _ => None,
        });

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| compile_level(index, block, symbols, background))
        .collect()
}

fn compile_level(
    level_idx: usize,
    block: &LevelBlock,
    symbols: &Symbols,
    background: Option<&ObjectDef>,
) -> Result<Level, CompileError> {
    let width = block.rows.first().map_or(0, |row| row.chars().count());
    if let Some(offset) = block
        .rows
        .iter()
        .position(|row| row.chars().count() != width)
    {
        return Err(CompileError::NonRectangularLevel {
            line: block.line + offset,
        });
    }

    let mut level = Level::new(level_idx, width, block.rows.len(), symbols.layer_count);

    for (y, row) in block.rows.iter().enumerate() {
        let line = block.line + y;
        for (x, ch) in row.chars().enumerate() {
            let symbol = ch.to_string();
            let objects: Vec<ObjectId> = match symbols.resolve(line, &symbol)? {
                LegendEntry::Object(id) => vec![*id],
                LegendEntry::Aggregate(ids) => ids.clone(),
                LegendEntry::Property(_) => {
                    return Err(CompileError::AmbiguousLevelSymbol { line, symbol });
                }
            };

            let Some(cell) = level.cell_mut(Position::new(x as i32, y as i32)) else {
                continue;
            };
            for id in objects {
                let Some(def) = symbols.object(id) else {
                    continue;
                };
                match cell.layer(def.layer) {
                    Some(occupant) if occupant.object != id => {
                        return Err(CompileError::LevelLayerConflict {
                            line,
                            symbol,
                            layer: def.layer.index(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        cell.replace(def.layer, Occupant::still(id));
                    }
                }
            }
        }
    }

    if let Some(background) = background {
        for position in level.positions() {
            if let Some(cell) = level.cell_mut(position) {
                if cell.layer(background.layer).is_none() {
                    cell.replace(background.layer, Occupant::still(background.id));
                }
            }
        }
    }

    Ok(level)
}
