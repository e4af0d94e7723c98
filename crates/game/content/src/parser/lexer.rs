//! Line splitting and comment removal.

use super::error::{ParseError, ParseErrorKind};

/// One source line with comments removed and surrounding whitespace trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SourceLine {
    /// 1-based.
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// A run of `=` characters only.
    pub fn is_separator(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c == '=')
    }
}

/// Splits `text` into lines, dropping `( ... )` comments.
///
/// Comments nest and may span lines; the newlines inside them are kept so
/// line numbers stay aligned with the source.
pub(crate) fn lex(text: &str) -> Result<Vec<SourceLine>, ParseError> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut number = 1;
    let mut depth = 0usize;
    let mut opened_at = 0;

    for ch in text.chars() {
        match ch {
            '\n' => {
                lines.push(finish(number, &mut current));
                number += 1;
            }
            '(' => {
                if depth == 0 {
                    opened_at = number;
                }
                depth += 1;
            }
            ')' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            _ => current.push(ch),
        }
    }

    if depth > 0 {
        return Err(ParseError::new(opened_at, ParseErrorKind::UnclosedComment));
    }
    if !current.is_empty() {
        lines.push(finish(number, &mut current));
    }
    Ok(lines)
}

fn finish(number: usize, current: &mut String) -> SourceLine {
    let text = current.trim().to_owned();
    current.clear();
    SourceLine { number, text }
}
