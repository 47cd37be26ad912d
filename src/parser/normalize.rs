//! Header text normalization
//!
//! Flattens a header into one whitespace-joined logical line with no
//! preprocessor directives and no comments, which is the form the namespace
//! extractor and the declaration parser work on.

use crate::parser::delimiters::{match_delimiters, Delimiter};
use crate::parser::error::ParseError;

/// Split raw header text into meaningful lines.
///
/// Drops a leading `#pragma` line, `#define` lines, trailing `//` comments
/// and lines left empty. Other directives (`#include`, guards) survive so the
/// include resolver can still see them.
pub fn clean_lines(text: &str) -> Vec<&str> {
    let mut lines = text.lines().peekable();
    if lines.peek().is_some_and(|line| line.trim_start().starts_with("#pragma")) {
        lines.next();
    }

    lines
        .map(str::trim)
        .filter(|line| !line.starts_with("#define"))
        .map(|line| match line.find("//") {
            Some(cut) => line[..cut].trim_end(),
            None => line,
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Normalize a raw header into a single comment-free logical line
pub fn normalize(text: &str) -> Result<String, ParseError> {
    let joined = clean_lines(text)
        .into_iter()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    strip_block_comments(&joined)
}

/// Repeatedly excise `/* ... */` regions, splicing the surrounding text
pub fn strip_block_comments(text: &str) -> Result<String, ParseError> {
    let mut raw = text.trim().to_string();
    loop {
        let offset = raw.find("/*");
        let spliced = match match_delimiters(&raw, Delimiter::Comment) {
            Ok(Some(m)) => join_parts(m.before, m.after),
            Ok(None) => return Ok(raw),
            Err(_) => {
                return Err(ParseError::MalformedComment {
                    offset: offset.unwrap_or_default(),
                })
            }
        };
        raw = spliced;
    }
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}
