//! Line-level parsers for every section except RULES.

use std::str::FromStr;

use puzzle_core::{Logger, Quantifier};

use super::ast::{
    LayerLine, LegendKind, LegendLine, LevelBlock, MetadataEntry, ObjectBlock, WinLine,
};
use super::error::{ParseError, ParseErrorKind};
use super::lexer::SourceLine;

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

pub(crate) fn parse_metadata(lines: &[&SourceLine]) -> Vec<MetadataEntry> {
    lines
        .iter()
        .filter(|line| !line.is_blank())
        .map(|line| {
            let (key, value) = match line.text.split_once(char::is_whitespace) {
                Some((key, value)) => (key, Some(value.trim().to_owned())),
                None => (line.text.as_str(), None),
            };
            MetadataEntry {
                line: line.number,
                key: key.to_ascii_lowercase(),
                value,
            }
        })
        .collect()
}

fn is_sprite_row(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '.' || c.is_ascii_digit())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Expect {
    Name,
    Colors,
    Sprite,
}

pub(crate) fn parse_objects(lines: &[&SourceLine]) -> Vec<ObjectBlock> {
    let mut blocks: Vec<ObjectBlock> = Vec::new();
    let mut expect = Expect::Name;

    for line in lines {
        if line.is_blank() {
            expect = Expect::Name;
            continue;
        }
        match (expect, blocks.last_mut()) {
            (Expect::Colors | Expect::Sprite, Some(block)) if is_sprite_row(&line.text) => {
                block.sprite.push(line.text.clone());
                expect = Expect::Sprite;
            }
            (Expect::Colors, Some(block)) => {
                block.colors = words(&line.text);
                expect = Expect::Sprite;
            }
            _ => {
                let mut names = words(&line.text).into_iter();
                let name = names.next().unwrap_or_default();
                blocks.push(ObjectBlock {
                    line: line.number,
                    name,
                    glyphs: names.collect(),
                    colors: Vec::new(),
                    sprite: Vec::new(),
                });
                expect = Expect::Colors;
            }
        }
    }

    blocks
}

pub(crate) fn parse_legend_line(line: &SourceLine) -> Result<LegendLine, ParseError> {
    let malformed = || ParseError::new(line.number, ParseErrorKind::MalformedLegend);

    let (symbol, definition) = line.text.split_once('=').ok_or_else(malformed)?;
    let symbol = symbol.trim();
    if symbol.is_empty() || symbol.contains(char::is_whitespace) {
        return Err(malformed());
    }

    let tokens: Vec<&str> = definition.split_whitespace().collect();
    if tokens.len() % 2 == 0 {
        return Err(malformed());
    }

    let mut names = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut kind = LegendKind::Alias;
    for (index, token) in tokens.iter().enumerate() {
        if index % 2 == 0 {
            names.push((*token).to_owned());
            continue;
        }
        let operator = if token.eq_ignore_ascii_case("or") {
            LegendKind::Property
        } else if token.eq_ignore_ascii_case("and") {
            LegendKind::Aggregate
        } else {
            return Err(malformed());
        };
        match kind {
            LegendKind::Alias => kind = operator,
            current if current != operator => {
                return Err(ParseError::new(
                    line.number,
                    ParseErrorKind::MixedLegendOperators,
                ));
            }
            _ => {}
        }
    }

    Ok(LegendLine {
        line: line.number,
        symbol: symbol.to_owned(),
        kind,
        names,
    })
}

pub(crate) fn parse_layer_line(line: &SourceLine) -> LayerLine {
    let names = line
        .text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    LayerLine {
        line: line.number,
        names,
    }
}

pub(crate) fn parse_win_line(line: &SourceLine) -> Result<WinLine, ParseError> {
    let fail = |kind: ParseErrorKind| ParseError::new(line.number, kind);
    let tokens: Vec<&str> = line.text.split_whitespace().collect();

    let (quantifier, subject, target) = match tokens.as_slice() {
        [quantifier, subject] => (*quantifier, *subject, None),
        [quantifier, subject, on, target] if on.eq_ignore_ascii_case("on") => {
            (*quantifier, *subject, Some(*target))
        }
        _ => return Err(fail(ParseErrorKind::MalformedWinCondition)),
    };
    let quantifier = Quantifier::from_str(quantifier)
        .map_err(|_| fail(ParseErrorKind::UnknownQuantifier(quantifier.to_owned())))?;
    if quantifier == Quantifier::All && target.is_none() {
        return Err(fail(ParseErrorKind::MissingWinTarget));
    }

    Ok(WinLine {
        line: line.number,
        quantifier,
        subject: subject.to_owned(),
        target: target.map(str::to_owned),
    })
}

fn is_message(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("message"))
}

pub(crate) fn parse_levels(lines: &[&SourceLine], logger: &dyn Logger) -> Vec<LevelBlock> {
    let mut levels = Vec::new();
    let mut current: Option<LevelBlock> = None;

    for line in lines {
        if line.is_blank() || is_message(&line.text) {
            if !line.is_blank() {
                logger.info(&format!("line {}: skipping level message", line.number));
            }
            levels.extend(current.take());
            continue;
        }
        current
            .get_or_insert_with(|| LevelBlock {
                line: line.number,
                rows: Vec::new(),
            })
            .rows
            .push(line.text.clone());
    }

    levels.extend(current);
    levels
}

#[cfg(test)]
mod tests {
    use puzzle_core::{LogLevel, MemoryLogger};

    use super::*;

    fn source(text: &str) -> Vec<SourceLine> {
        text.lines()
            .enumerate()
            .map(|(index, text)| SourceLine {
                number: index + 1,
                text: text.trim().to_owned(),
            })
            .collect()
    }

    fn refs(lines: &[SourceLine]) -> Vec<&SourceLine> {
        lines.iter().collect()
    }

    #[test]
    fn object_blocks() {
        let lines = source(
            "Background\nlightgreen green\n\nPlayer P\nblack orange\n.000.\n.111.\nWall\nbrown\n\nCrate\n00\n00",
        );
        let objects = parse_objects(&refs(&lines));

        let names: Vec<_> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Background", "Player", "Wall", "Crate"]);
        assert_eq!(objects[1].glyphs, vec!["P".to_owned()]);
        assert_eq!(objects[1].colors.len(), 2);
        assert_eq!(objects[1].sprite.len(), 2);
        assert_eq!(objects[2].line, 8);
        assert_eq!(objects[2].colors, vec!["brown".to_owned()]);
        assert!(objects[3].colors.is_empty());
        assert_eq!(objects[3].sprite.len(), 2);
    }

    #[test]
    fn legend_lines() {
        let lines = source(
            "# = Wall\nObstacle = Wall or Crate OR Ice\n@ = Crate and Target\n\
             X = a or b and c\nY Wall\nZ = a b\nW =",
        );
        let parsed: Vec<_> = lines.iter().map(parse_legend_line).collect();

        let alias = parsed[0].as_ref().unwrap();
        assert_eq!((alias.symbol.as_str(), alias.kind), ("#", LegendKind::Alias));
        let property = parsed[1].as_ref().unwrap();
        assert_eq!(property.kind, LegendKind::Property);
        assert_eq!(property.names, vec!["Wall", "Crate", "Ice"]);
        assert_eq!(parsed[2].as_ref().unwrap().kind, LegendKind::Aggregate);

        let kind = |index: usize| parsed[index].as_ref().unwrap_err().kind.clone();
        assert_eq!(kind(3), ParseErrorKind::MixedLegendOperators);
        assert_eq!(kind(4), ParseErrorKind::MalformedLegend);
        assert_eq!(kind(5), ParseErrorKind::MalformedLegend);
        assert_eq!(kind(6), ParseErrorKind::MalformedLegend);
        assert_eq!(parsed[6].as_ref().unwrap_err().line, 7);
    }

    #[test]
    fn layers_accept_commas_and_spaces() {
        let lines = source("Player, Wall Crate,,Ice");
        assert_eq!(
            parse_layer_line(&lines[0]).names,
            vec!["Player", "Wall", "Crate", "Ice"]
        );
    }

    #[test]
    fn win_lines() {
        let lines =
            source("all Crate on Target\nany Player\nAll Crate\nmost Crate\nno Crate on");
        let parsed: Vec<_> = lines.iter().map(parse_win_line).collect();

        let all = parsed[0].as_ref().unwrap();
        assert_eq!(all.quantifier, Quantifier::All);
        assert_eq!(all.target.as_deref(), Some("Target"));
        assert_eq!(parsed[1].as_ref().unwrap().quantifier, Quantifier::Some);

        let kind = |index: usize| parsed[index].as_ref().unwrap_err().kind.clone();
        assert_eq!(kind(2), ParseErrorKind::MissingWinTarget);
        assert_eq!(kind(3), ParseErrorKind::UnknownQuantifier("most".into()));
        assert_eq!(kind(4), ParseErrorKind::MalformedWinCondition);
    }

    #[test]
    fn levels_split_on_blanks_and_messages() {
        let lines = source("#####\n#P.*#\n\n\nmessage well done\n###\n#P#\n");
        let logger = MemoryLogger::new();
        let levels = parse_levels(&refs(&lines), &logger);

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].line, 1);
        assert_eq!(levels[0].rows, vec!["#####", "#P.*#"]);
        assert_eq!(levels[1].line, 6);
        assert_eq!(levels[1].rows.len(), 2);
        assert!(logger.contains(LogLevel::Info, "message"));
    }
}
