//! Object arena, legend resolution and collision layer assignment.

use std::collections::BTreeMap;

use puzzle_core::{LayerId, LegendEntry, Logger, ObjectDef, ObjectId, ObjectSet};

use super::CompileError;
use super::graphics::compile_graphics;
use crate::parser::{LegendKind, LegendLine, ParsedGame};

/// Every name a document can use, resolved.
#[derive(Clone, Debug)]
pub(crate) struct Symbols {
    pub objects: Vec<ObjectDef>,
    /// Lower-cased name to entry; object names and legend symbols share it.
    pub legend: BTreeMap<String, LegendEntry>,
    pub layer_count: usize,
}

impl Symbols {
    pub fn build(parsed: &ParsedGame, logger: &dyn Logger) -> Result<Self, CompileError> {
        let mut symbols = Self {
            objects: Vec::with_capacity(parsed.objects.len()),
            legend: BTreeMap::new(),
            layer_count: 0,
        };

        for (index, block) in parsed.objects.iter().enumerate() {
            let id = u16::try_from(index)
                .map(ObjectId)
                .map_err(|_| CompileError::TooManyObjects {
                    max: u16::MAX as usize,
                })?;
            symbols.define(block.line, &block.name, LegendEntry::Object(id))?;
            for glyph in &block.glyphs {
                symbols.define(block.line, glyph, LegendEntry::Object(id))?;
            }
            symbols.objects.push(ObjectDef {
                id,
                identifier: block.name.clone(),
                layer: LayerId(0),
                aliases: block.glyphs.clone(),
                graphics: compile_graphics(block, logger),
            });
        }

        for line in &parsed.legend {
            symbols.define_legend(line)?;
        }

        symbols.assign_layers(parsed)?;
        Ok(symbols)
    }

    pub fn resolve(&self, line: usize, name: &str) -> Result<&LegendEntry, CompileError> {
        self.legend
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| CompileError::UndefinedName {
                line,
                name: name.to_owned(),
            })
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectDef> {
        self.objects.get(id.index())
    }

    fn define(&mut self, line: usize, name: &str, entry: LegendEntry) -> Result<(), CompileError> {
        let key = name.to_ascii_lowercase();
        if self.legend.contains_key(&key) {
            return Err(CompileError::DuplicateName {
                line,
                name: name.to_owned(),
            });
        }
        self.legend.insert(key, entry);
        Ok(())
    }

    fn define_legend(&mut self, line: &LegendLine) -> Result<(), CompileError> {
        let entry = match line.kind {
            LegendKind::Alias => {
                let name = line.names.first().map(String::as_str).unwrap_or_default();
                self.resolve(line.line, name)?.clone()
            }
            LegendKind::Property => {
                let mut members = ObjectSet::new();
                for name in &line.names {
                    match self.resolve(line.line, name)? {
                        LegendEntry::Aggregate(_) => {
                            return Err(CompileError::PropertyContainsAggregate {
                                line: line.line,
                                symbol: line.symbol.clone(),
                                name: name.clone(),
                            });
                        }
                        entry => members.extend_from(&entry.objects()),
                    }
                }
                LegendEntry::Property(members)
            }
            LegendKind::Aggregate => {
                let mut members = Vec::new();
                for name in &line.names {
                    match self.resolve(line.line, name)? {
                        LegendEntry::Property(_) => {
                            return Err(CompileError::AggregateContainsProperty {
                                line: line.line,
                                symbol: line.symbol.clone(),
                                name: name.clone(),
                            });
                        }
                        LegendEntry::Object(id) => members.push(*id),
                        LegendEntry::Aggregate(ids) => members.extend_from_slice(ids),
                    }
                }
                LegendEntry::Aggregate(members)
            }
        };

        if let LegendEntry::Object(id) = entry {
            if let Some(def) = self.objects.get_mut(id.index()) {
                def.aliases.push(line.symbol.clone());
            }
        }
        self.define(line.line, &line.symbol, entry)
    }

    /// Each object must land in exactly one layer; the first layer listed is
    /// the bottom one.
    fn assign_layers(&mut self, parsed: &ParsedGame) -> Result<(), CompileError> {
        let mut assigned: Vec<Option<LayerId>> = vec![None; self.objects.len()];

        for (index, layer_line) in parsed.layers.iter().enumerate() {
            let layer = u16::try_from(index)
                .map(LayerId)
                .map_err(|_| CompileError::TooManyLayers {
                    max: u16::MAX as usize,
                })?;
            for name in &layer_line.names {
                let members = self.resolve(layer_line.line, name)?.objects();
                for id in members.iter() {
                    match assigned[id.index()] {
                        Some(existing) if existing != layer => {
                            return Err(CompileError::MultipleLayers {
                                line: layer_line.line,
                                name: self.objects[id.index()].identifier.clone(),
                            });
                        }
                        _ => assigned[id.index()] = Some(layer),
                    }
                }
            }
        }

        for (def, (layer, block)) in self
            .objects
            .iter_mut()
            .zip(assigned.into_iter().zip(&parsed.objects))
        {
            def.layer = layer.ok_or_else(|| CompileError::MissingLayer {
                line: block.line,
                name: def.identifier.clone(),
            })?;
        }
        self.layer_count = parsed.layers.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::NullLogger;

    use super::*;
    use crate::parser::Parser;

    fn build(text: &str) -> Result<Symbols, CompileError> {
        let parsed = Parser::new(&NullLogger).parse(text).unwrap();
        Symbols::build(&parsed, &NullLogger)
    }

    const HEADER: &str = "OBJECTS\nBackground\n\nPlayer p\n\nWall\n\nCrate\n\n";

    #[test]
    fn legend_entries_resolve() {
        let text = format!(
            "{HEADER}LEGEND\n# = Wall\nSolid = Wall or Crate\nPile = # and Crate\n\
             Thing = Solid or Player\n\nCOLLISIONLAYERS\nBackground\nPlayer, Solid\n"
        );
        let symbols = build(&text).unwrap();

        let wall = ObjectId(2);
        let crate_id = ObjectId(3);
        assert_eq!(symbols.resolve(1, "p").unwrap(), &LegendEntry::Object(ObjectId(1)));
        assert_eq!(symbols.resolve(1, "#").unwrap(), &LegendEntry::Object(wall));
        assert_eq!(
            symbols.resolve(1, "SOLID").unwrap(),
            &LegendEntry::Property([wall, crate_id].into_iter().collect())
        );
        assert_eq!(
            symbols.resolve(1, "pile").unwrap(),
            &LegendEntry::Aggregate(vec![wall, crate_id])
        );
        assert_eq!(symbols.resolve(1, "thing").unwrap().objects().len(), 3);
        assert_eq!(symbols.objects[2].aliases, vec!["#".to_owned()]);
        assert_eq!(symbols.objects[3].layer, LayerId(1));
        assert_eq!(symbols.layer_count, 2);
    }

    #[test]
    fn rejects_bad_legends() {
        let duplicate = format!("{HEADER}LEGEND\nwall = Crate\n");
        assert!(matches!(
            build(&duplicate),
            Err(CompileError::DuplicateName { line: 11, .. })
        ));

        let undefined = format!("{HEADER}LEGEND\nX = Ghost\n");
        assert!(matches!(
            build(&undefined),
            Err(CompileError::UndefinedName { name, .. }) if name == "Ghost"
        ));

        let mixed = format!("{HEADER}LEGEND\nS = Wall or Crate\nX = S and Player\n");
        assert!(matches!(
            build(&mixed),
            Err(CompileError::AggregateContainsProperty { .. })
        ));

        let mixed = format!("{HEADER}LEGEND\nA = Wall and Crate\nX = A or Player\n");
        assert!(matches!(
            build(&mixed),
            Err(CompileError::PropertyContainsAggregate { .. })
        ));
    }

    #[test]
    fn every_object_needs_exactly_one_layer() {
        let missing = format!("{HEADER}COLLISIONLAYERS\nBackground\nPlayer, Wall\n");
        assert!(matches!(
            build(&missing),
            Err(CompileError::MissingLayer { name, line: 8 }) if name == "Crate"
        ));

        let twice = format!("{HEADER}COLLISIONLAYERS\nBackground, Crate\nPlayer, Wall, Crate\n");
        assert!(matches!(
            build(&twice),
            Err(CompileError::MultipleLayers { name, .. }) if name == "Crate"
        ));
    }
}
