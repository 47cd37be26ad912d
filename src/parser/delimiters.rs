//! Balanced delimiter matching on raw text
//!
//! One depth-counting scan serves every bracket kind the header parser
//! cares about, including the two-character block comment markers.

use crate::parser::error::{excerpt, ParseError};

/// Delimiter pairs recognised by [`match_delimiters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Round,
    Square,
    Curly,
    Angle,
    Comment,
}

impl Delimiter {
    /// Opening and closing markers
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            Delimiter::Round => ("(", ")"),
            Delimiter::Square => ("[", "]"),
            Delimiter::Curly => ("{", "}"),
            Delimiter::Angle => ("<", ">"),
            Delimiter::Comment => ("/*", "*/"),
        }
    }

    pub fn width(self) -> usize {
        self.markers().0.len()
    }
}

/// Text around one matched delimiter pair, each part trimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched<'a> {
    pub before: &'a str,
    pub inside: &'a str,
    pub after: &'a str,
}

/// Find the first `open` marker and its balancing `close` marker.
///
/// Returns `Ok(None)` when the text has no opening marker at all and
/// [`ParseError::UnbalancedDelimiter`] when the depth never returns to zero.
pub fn match_delimiters(text: &str, delimiter: Delimiter) -> Result<Option<Matched<'_>>, ParseError> {
    let (open, close) = delimiter.markers();
    let width = delimiter.width();

    let Some(start) = text.find(open) else {
        return Ok(None);
    };

    let body_start = start + width;
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = body_start;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(open.as_bytes()) {
            depth += 1;
            i += width;
        } else if rest.starts_with(close.as_bytes()) {
            depth -= 1;
            if depth == 0 {
                return Ok(Some(Matched {
                    before: text[..start].trim(),
                    inside: text[body_start..i].trim(),
                    after: text[i + width..].trim(),
                }));
            }
            i += width;
        } else {
            i += 1;
        }
    }

    Err(ParseError::UnbalancedDelimiter {
        open,
        close,
        context: excerpt(&text[start..]),
    })
}
