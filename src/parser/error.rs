//! Parse error taxonomy
//!
//! Every variant except [`ParseError::UnsupportedType`] is fatal: it aborts
//! processing of the current header and no stub is written for it.
//! `UnsupportedType` is recorded as a warning while the parse continues with
//! the offending declaration left out.

use thiserror::Error;

/// Longest source excerpt quoted in an error message
const EXCERPT_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unbalanced '{open}' ... '{close}' in `{context}`")]
    UnbalancedDelimiter {
        open: &'static str,
        close: &'static str,
        context: String,
    },

    #[error("block comment opened at byte {offset} is never closed")]
    MalformedComment { offset: usize },

    #[error("found {count} namespaces, at most one per header is supported")]
    MultipleNamespaces { count: usize },

    #[error("namespace keyword is not followed by a name in `{context}`")]
    MissingNamespaceName { context: String },

    #[error("constructor name `{found}` does not match class `{class_name}`")]
    NameMismatch { class_name: String, found: String },

    #[error("declarators do not share the same array depth: `{declarators}`")]
    InconsistentArrayDepth { declarators: String },

    #[error("unsupported type `{kind}` in `{declaration}`, declaration skipped")]
    UnsupportedType { declaration: String, kind: String },

    #[error("cannot find the end of function `{name}`")]
    FunctionEndNotFound { name: String },

    #[error("improper include line: `{line}`")]
    MalformedInclude { line: String },

    #[error("expected {expected} at byte {offset}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("unterminated literal starting at byte {offset}")]
    UnterminatedLiteral { offset: usize },
}

impl ParseError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ParseError::UnsupportedType { .. })
    }
}

/// Shorten `text` for inclusion in an error message
pub(crate) fn excerpt(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
