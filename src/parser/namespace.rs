//! Namespace extraction
//!
//! A header may wrap its declarations in at most one `namespace name { ... }`
//! block. The body becomes the text the item parser runs on and the name ends
//! up in the stub's `cdef extern from` line.

use crate::parser::delimiters::{match_delimiters, Delimiter};
use crate::parser::error::{excerpt, ParseError};
use regex::Regex;
use std::sync::LazyLock;

static NAMESPACE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnamespace\b").expect("valid namespace regex"));

static NAMESPACE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_][A-Za-z0-9_:]*)").expect("valid namespace name regex")
});

/// Split normalized text into the namespace name and the code inside it.
///
/// Text without a namespace passes through unchanged with `None`.
pub fn extract_namespace(code: &str) -> Result<(Option<String>, &str), ParseError> {
    match NAMESPACE_KEYWORD.find_iter(code).count() {
        0 => Ok((None, code)),
        1 => {
            let Some(captures) = NAMESPACE_NAME.captures(code) else {
                return Err(ParseError::MissingNamespaceName {
                    context: excerpt(code),
                });
            };
            let name = &captures[1];
            let rest = &code[captures.get(0).map_or(code.len(), |m| m.end())..];

            match match_delimiters(rest, Delimiter::Curly)? {
                Some(matched) => Ok((Some(name.to_string()), matched.inside)),
                None => Err(ParseError::UnexpectedEnd {
                    expected: format!("'{{' opening namespace {}", name),
                }),
            }
        }
        count => Err(ParseError::MultipleNamespaces { count }),
    }
}
