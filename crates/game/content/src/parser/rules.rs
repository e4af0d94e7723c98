//! Rule line syntax: `['+'] direction* [ cells ] -> [ cells ] command*`.

use std::iter::Peekable;
use std::str::FromStr;
use std::vec::IntoIter;

use super::ast::{
    CommandKeyword, MovementKeyword, PatternCell, PatternEntry, RuleDirection, RuleLine,
};
use super::error::{ParseError, ParseErrorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Bar,
    Arrow,
    Word(&'a str),
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self {
            Token::Open => "[",
            Token::Close => "]",
            Token::Bar => "|",
            Token::Arrow => "->",
            Token::Word(word) => word,
        }
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let punct = match ch {
            '[' => Some(Token::Open),
            ']' => Some(Token::Close),
            '|' => Some(Token::Bar),
            '-' if matches!(chars.peek(), Some((_, '>'))) => {
                chars.next();
                Some(Token::Arrow)
            }
            _ => None,
        };

        if punct.is_some() || ch.is_whitespace() {
            if let Some(from) = start.take() {
                tokens.push(Token::Word(&text[from..index]));
            }
            tokens.extend(punct);
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(from) = start {
        tokens.push(Token::Word(&text[from..]));
    }
    tokens
}

type Tokens<'a> = Peekable<IntoIter<Token<'a>>>;

fn unexpected(token: Token<'_>) -> ParseErrorKind {
    ParseErrorKind::UnexpectedToken(token.text().to_owned())
}

/// Parses one rule written on source line `line`.
pub(crate) fn parse_rule(line: usize, text: &str) -> Result<RuleLine, ParseError> {
    let fail = |kind: ParseErrorKind| ParseError::new(line, kind);
    let mut tokens = tokenize(text).into_iter().peekable();

    let mut joins_previous = false;
    let mut directions = Vec::new();
    while let Some(Token::Word(word)) = tokens.peek().copied() {
        tokens.next();
        if word == "+" {
            joins_previous = true;
        } else {
            let direction = RuleDirection::from_str(word)
                .map_err(|_| fail(ParseErrorKind::UnknownRulePrefix(word.to_owned())))?;
            directions.push(direction);
        }
    }

    match tokens.next() {
        Some(Token::Open) => {}
        None | Some(Token::Arrow) => return Err(fail(ParseErrorKind::MissingPattern)),
        Some(other) => return Err(fail(unexpected(other))),
    }
    let lhs = parse_pattern(&mut tokens).map_err(fail)?;

    match tokens.next() {
        Some(Token::Arrow) => {}
        Some(Token::Open) => return Err(fail(ParseErrorKind::MultiplePatterns)),
        None | Some(Token::Word(_)) => return Err(fail(ParseErrorKind::MissingArrow)),
        Some(other) => return Err(fail(unexpected(other))),
    }

    let rhs = if tokens.next_if_eq(&Token::Open).is_some() {
        Some(parse_pattern(&mut tokens).map_err(fail)?)
    } else {
        None
    };

    let mut commands = Vec::new();
    for token in tokens {
        match token {
            Token::Word(word) => {
                let command = CommandKeyword::from_str(word)
                    .map_err(|_| fail(ParseErrorKind::UnknownCommand(word.to_owned())))?;
                commands.push(command);
            }
            Token::Open => return Err(fail(ParseErrorKind::MultiplePatterns)),
            other => return Err(fail(unexpected(other))),
        }
    }

    Ok(RuleLine {
        line,
        joins_previous,
        directions,
        lhs,
        rhs,
        commands,
    })
}

/// Reads cells up to the closing `]`; the opening `[` is already consumed.
fn parse_pattern(tokens: &mut Tokens<'_>) -> Result<Vec<PatternCell>, ParseErrorKind> {
    let mut cells = Vec::new();
    let mut words = Vec::new();

    loop {
        match tokens.next() {
            Some(Token::Word(word)) => {
                let (symbol, rest) = split_movement_symbol(word);
                words.extend(symbol);
                words.push(rest);
            }
            Some(Token::Bar) => cells.push(parse_cell(&std::mem::take(&mut words))),
            Some(Token::Close) => {
                cells.push(parse_cell(&words));
                return Ok(cells);
            }
            Some(Token::Open) | Some(Token::Arrow) | None => {
                return Err(ParseErrorKind::UnterminatedPattern);
            }
        }
    }
}

/// `>Player` is the movement symbol `>` followed by `Player`.
fn split_movement_symbol(word: &str) -> (Option<&str>, &str) {
    match word.char_indices().nth(1) {
        Some((at, _)) if word.starts_with(['>', '<', '^']) => (Some(&word[..at]), &word[at..]),
        _ => (None, word),
    }
}

/// `no` and movement keywords only act as prefixes when a name follows them.
fn parse_cell(words: &[&str]) -> PatternCell {
    let mut entries = Vec::new();
    let mut index = 0;

    while index < words.len() {
        let has_next = |at: usize| at + 1 < words.len();

        let mut negated = false;
        if words[index].eq_ignore_ascii_case("no") && has_next(index) {
            negated = true;
            index += 1;
        }

        let mut movement = None;
        if has_next(index) {
            if let Ok(keyword) = MovementKeyword::from_str(words[index]) {
                movement = Some(keyword);
                index += 1;
            }
        }

        entries.push(PatternEntry {
            negated,
            movement,
            name: words[index].to_owned(),
        });
        index += 1;
    }

    PatternCell { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(negated: bool, movement: Option<MovementKeyword>, name: &str) -> PatternEntry {
        PatternEntry {
            negated,
            movement,
            name: name.to_owned(),
        }
    }

    #[test]
    fn parses_a_push_rule() {
        let rule =
            parse_rule(4, "[ > Player | Crate | no Wall ] -> [ | Player | Crate ]").unwrap();

        assert_eq!(rule.line, 4);
        assert!(!rule.joins_previous);
        assert!(rule.directions.is_empty());
        assert_eq!(rule.lhs.len(), 3);
        assert_eq!(
            rule.lhs[0].entries,
            vec![entry(false, Some(MovementKeyword::Forward), "Player")]
        );
        assert_eq!(rule.lhs[2].entries, vec![entry(true, None, "Wall")]);
        let rhs = rule.rhs.unwrap();
        assert!(rhs[0].entries.is_empty());
        assert_eq!(rhs[1].entries, vec![entry(false, None, "Player")]);
    }

    #[test]
    fn tokens_need_no_spaces() {
        let rule = parse_rule(1, "+ horizontal[>Player|Crate]->[>Player|>Crate]").unwrap();
        assert!(rule.joins_previous);
        assert_eq!(rule.directions, vec![RuleDirection::Horizontal]);
        assert_eq!(
            rule.lhs,
            vec![
                PatternCell {
                    entries: vec![entry(false, Some(MovementKeyword::Forward), "Player")]
                },
                PatternCell {
                    entries: vec![entry(false, None, "Crate")]
                },
            ]
        );
        let rhs = rule.rhs.unwrap();
        assert_eq!(
            rhs[1].entries,
            vec![entry(false, Some(MovementKeyword::Forward), "Crate")]
        );

        let rule = parse_rule(1, "[<Crate|^Crate|vCrate]->[]").unwrap();
        assert_eq!(rule.lhs[0].entries[0].movement, Some(MovementKeyword::Backward));
        assert_eq!(rule.lhs[1].entries[0].movement, Some(MovementKeyword::TurnLeft));
        assert_eq!(rule.lhs[2].entries, vec![entry(false, None, "vCrate")]);
    }

    #[test]
    fn trailing_keywords_are_names() {
        let rule = parse_rule(1, "[ no v ] -> [ v ]").unwrap();
        assert_eq!(rule.lhs[0].entries, vec![entry(true, None, "v")]);
        assert_eq!(rule.rhs.unwrap()[0].entries, vec![entry(false, None, "v")]);

        let rule = parse_rule(1, "[ stationary Crate ] -> [ UP Crate ]").unwrap();
        assert_eq!(
            rule.lhs[0].entries,
            vec![entry(false, Some(MovementKeyword::Stationary), "Crate")]
        );
        assert_eq!(
            rule.rhs.unwrap()[0].entries,
            vec![entry(false, Some(MovementKeyword::Up), "Crate")]
        );
    }

    #[test]
    fn command_only_rules() {
        let rule = parse_rule(2, "late [ Player Goal ] -> win");
        assert_eq!(
            rule.unwrap_err().kind,
            ParseErrorKind::UnknownRulePrefix("late".into())
        );

        let rule = parse_rule(2, "[ Player Goal ] -> win").unwrap();
        assert!(rule.rhs.is_none());
        assert_eq!(rule.commands, vec![CommandKeyword::Win]);
    }

    #[test]
    fn malformed_rules() {
        let kind = |text| parse_rule(9, text).unwrap_err().kind;

        assert_eq!(kind("[ Player | Crate -> [ Player ]"), ParseErrorKind::UnterminatedPattern);
        assert_eq!(kind("[ Player | Crate"), ParseErrorKind::UnterminatedPattern);
        assert_eq!(kind("[ Player ] [ Crate ]"), ParseErrorKind::MultiplePatterns);
        assert_eq!(kind("[ Player ] -> [ ] [ ]"), ParseErrorKind::MultiplePatterns);
        assert_eq!(kind("[ Player ]"), ParseErrorKind::MissingArrow);
        assert_eq!(kind("right"), ParseErrorKind::MissingPattern);
        assert_eq!(
            kind("[ Player ] -> [ ] again"),
            ParseErrorKind::UnknownCommand("again".into())
        );
        assert_eq!(parse_rule(9, "[ a ]").unwrap_err().line, 9);
    }
}
