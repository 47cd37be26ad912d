//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! token helpers, depth-aware scanning, and the item loop that drives both the
//! top level of a header and the body of every class.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent over the token stream of one normalized
//! header (or of one public section of a class body):
//! - This module: Parser struct, helpers, `parse_item` dispatch
//! - `classify`: lookahead deciding which declaration kind starts next
//! - `types`: type expressions (`const Foo<int>*`, `unsigned long&`)
//! - `declarations`: one method per declaration kind
//!
//! Parser methods are split across those files using `impl Parser` blocks.
//! A class body is parsed by a child parser that carries the class name and a
//! deeper nesting level, so top-level and in-class parsing share one state
//! machine.

use crate::parser::ast::{Declaration, Span};
use crate::parser::classify::DeclKind;
use crate::parser::error::{excerpt, ParseError};
use crate::parser::lexer::{Lexer, Token};
use crate::parser::namespace::extract_namespace;
use crate::parser::normalize::normalize;
use log::debug;
use std::mem::discriminant;

/// Result of parsing one whole header
#[derive(Debug, Clone, Default)]
pub struct ParsedHeader {
    pub namespace: Option<String>,
    pub declarations: Vec<Declaration>,
    /// Non-fatal decisions, always [`ParseError::UnsupportedType`]
    pub warnings: Vec<ParseError>,
}

/// Recursive descent parser for the public surface of a C++ header
pub struct Parser<'src> {
    pub(crate) source: &'src str,
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) class_name: Option<String>,
    pub(crate) depth: usize,
    pub(crate) warnings: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Top-level parser over normalized header text
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            position: 0,
            class_name: None,
            depth: 0,
            warnings: Vec::new(),
        })
    }

    /// Parser over text that sits inside the body of `class_name`
    pub fn in_class(source: &'src str, class_name: &str) -> Result<Self, ParseError> {
        let mut parser = Self::new(source)?;
        parser.class_name = Some(class_name.to_string());
        parser.depth = 1;
        Ok(parser)
    }

    /// Child parser over `tokens[start..end]` for a class body section
    pub(crate) fn child(&self, start: usize, end: usize, class_name: &str) -> Self {
        let eof_at = self.tokens[end].span().start;
        let mut tokens = self.tokens[start..end].to_vec();
        tokens.push(Token::Eof(Span::new(eof_at, eof_at)));
        Self {
            source: self.source,
            tokens,
            position: 0,
            class_name: Some(class_name.to_string()),
            depth: self.depth + 1,
            warnings: Vec::new(),
        }
    }

    /// Parse declarations until the input is exhausted
    pub fn parse_declarations(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            if let Some(decl) = self.parse_item()? {
                declarations.push(decl);
            }
        }

        Ok(declarations)
    }

    /// Consume exactly one declaration.
    ///
    /// `Ok(None)` means the declaration was consumed but is not emitted
    /// (typedefs, destructors, forward declarations, filtered types).
    pub fn parse_item(&mut self) -> Result<Option<Declaration>, ParseError> {
        if self.match_token(&Token::Semicolon(Span::default())) {
            return Ok(None);
        }
        if self.is_at_end() {
            return Err(ParseError::UnexpectedEnd {
                expected: "a declaration".to_string(),
            });
        }

        let kind = self.classify();
        debug!(
            "{:indent$}{:?}: {}",
            "",
            kind,
            excerpt(self.remaining()),
            indent = self.depth * 2
        );

        match kind {
            DeclKind::Class => self.parse_class(),
            DeclKind::Variable => self.parse_variable(),
            DeclKind::Function => self.parse_function(),
            DeclKind::Constructor => self.parse_constructor(),
            DeclKind::Destructor => self.parse_destructor(),
            DeclKind::Typedef => self.parse_typedef(),
            DeclKind::Template => self.parse_template(),
            DeclKind::Inline => self.parse_inline(),
        }
    }

    /// Unconsumed text, trimmed
    pub fn remaining(&self) -> &'src str {
        let start = self.peek().span().start;
        let end = self.tokens.last().map_or(start, |eof| eof.span().start);
        self.source[start..end.max(start)].trim()
    }

    pub fn warnings(&self) -> &[ParseError] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ParseError> {
        self.warnings
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Declarations parsed inside a class body render without `cdef`
    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        discriminant(self.peek()) == discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.token_at(self.position.saturating_sub(1))
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        self.token_at(self.position)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        self.token_at(self.position + n)
    }

    /// Token at `index`, or the trailing `Eof` past the end
    pub(crate) fn token_at(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub(crate) fn eof_index(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Whether the operator token at `index` is part of an operator function
    /// name such as `operator<`, `operator<<` or `operator==`
    pub(crate) fn is_operator_symbol(&self, index: usize) -> bool {
        let mut cursor = index;
        while cursor > 0 {
            cursor -= 1;
            match self.token_at(cursor) {
                Token::Lt(_)
                | Token::Gt(_)
                | Token::Eq(_)
                | Token::Star(_)
                | Token::Amp(_)
                | Token::Tilde(_)
                | Token::Symbol(..) => {}
                token => return token.is_ident("operator"),
            }
        }
        false
    }

    pub(crate) fn expect_token(&mut self, token: &Token, expected: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Error describing the current token
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Token::Eof(_) => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
            token => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
                offset: token.span().start,
            },
        }
    }

    /// Source text covered by `tokens[start..end]`
    pub(crate) fn text(&self, start: usize, end: usize) -> &'src str {
        if start >= end {
            return "";
        }
        let from = self.token_at(start).span().start;
        let to = self.token_at(end - 1).span().end;
        self.source[from..to].trim()
    }

    /// Index of the token closing the bracket opened at `open`
    pub(crate) fn matching_close(&self, open: usize) -> Result<usize, ParseError> {
        let (open_marker, close_marker) = match self.token_at(open) {
            Token::LParen(_) => ("(", ")"),
            Token::LBrace(_) => ("{", "}"),
            Token::LBracket(_) => ("[", "]"),
            Token::Lt(_) => ("<", ">"),
            _ => return Err(self.unexpected("an opening bracket")),
        };
        let opener = discriminant(self.token_at(open));
        let closer = discriminant(&closing_token(self.token_at(open)));

        let mut depth = 0usize;
        for index in open..self.eof_index() {
            let current = discriminant(self.token_at(index));
            if current == opener {
                depth += 1;
            } else if current == closer {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }
        }

        let from = self.token_at(open).span().start;
        Err(ParseError::UnbalancedDelimiter {
            open: open_marker,
            close: close_marker,
            context: excerpt(&self.source[from..]),
        })
    }

    /// First index at or after `from` whose token satisfies `stop` while no
    /// `()`, `[]` or `{}` is open; the `Eof` index when there is none
    pub(crate) fn find_top_level(&self, from: usize, stop: impl Fn(&Token) -> bool) -> usize {
        let mut depth = 0usize;
        for index in from..self.eof_index() {
            let token = self.token_at(index);
            if depth == 0 && stop(token) {
                return index;
            }
            match token {
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) => depth += 1,
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
        }
        self.eof_index()
    }

    /// Split `tokens[start..end]` on commas outside any bracket pair
    pub(crate) fn split_top_level(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut groups = Vec::new();
        if start >= end {
            return groups;
        }

        let mut depth = 0usize;
        let mut group_start = start;
        for index in start..end {
            match self.token_at(index) {
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) | Token::Lt(_) => depth += 1,
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) | Token::Gt(_) => {
                    depth = depth.saturating_sub(1)
                }
                Token::Comma(_) if depth == 0 => {
                    groups.push((group_start, index));
                    group_start = index + 1;
                }
                _ => {}
            }
        }
        groups.push((group_start, end));
        groups
    }
}

fn closing_token(open: &Token) -> Token {
    let span = open.span();
    match open {
        Token::LParen(_) => Token::RParen(span),
        Token::LBrace(_) => Token::RBrace(span),
        Token::LBracket(_) => Token::RBracket(span),
        _ => Token::Gt(span),
    }
}

/// Parse one declaration from the front of `code`.
///
/// Returns the declaration (if it is emitted) and the trimmed text left after
/// it, `None` once the input is exhausted.
pub fn parse_item<'a>(
    code: &'a str,
    class_name: Option<&str>,
) -> Result<(Option<Declaration>, Option<&'a str>), ParseError> {
    let mut parser = match class_name {
        Some(name) => Parser::in_class(code, name)?,
        None => Parser::new(code)?,
    };
    let item = parser.parse_item()?;
    let rest = parser.remaining();
    Ok((item, (!rest.is_empty()).then_some(rest)))
}

/// Parse every top-level declaration of normalized text
pub fn parse_declarations(code: &str) -> Result<Vec<Declaration>, ParseError> {
    Parser::new(code)?.parse_declarations()
}

/// Run the whole pipeline on raw header text:
/// normalize, extract the namespace, then parse its body.
pub fn parse_header(raw: &str) -> Result<ParsedHeader, ParseError> {
    let code = normalize(raw)?;
    let (namespace, body) = extract_namespace(&code)?;

    let mut parser = Parser::new(body)?;
    let declarations = parser.parse_declarations()?;

    Ok(ParsedHeader {
        namespace,
        declarations,
        warnings: parser.into_warnings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Type, Variable};

    #[test]
    fn test_parse_item_returns_remainder() {
        let (item, rest) = parse_item("int x; double y;", None).unwrap();
        assert_eq!(
            item,
            Some(Declaration::Variable(Variable::new(Type::Int, "x", false)))
        );
        assert_eq!(rest, Some("double y;"));

        let (_, rest) = parse_item("double y;", None).unwrap();
        assert_eq!(rest, None);
    }

    #[test]
    fn test_parse_item_in_class_is_nested() {
        let (item, _) = parse_item("int x;", Some("Foo")).unwrap();
        assert_eq!(
            item,
            Some(Declaration::Variable(Variable::new(Type::Int, "x", true)))
        );
    }

    #[test]
    fn test_stray_semicolons_are_consumed() {
        let decls = parse_declarations("; int x;; ;").unwrap();
        assert_eq!(decls.len(), 1);
    }

    #[test]
    fn test_only_typedefs_gives_empty_list() {
        let header = parse_header("// types\ntypedef int count_t;\ntypedef double real;\n").unwrap();
        assert!(header.declarations.is_empty());
        assert!(header.warnings.is_empty());
    }

    #[test]
    fn test_matching_close_unbalanced() {
        let parser = Parser::new("void f(int a;").unwrap();
        let err = parser.matching_close(2).unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedDelimiter { open: "(", .. }));
    }

    #[test]
    fn test_split_top_level_ignores_nested_commas() {
        let parser = Parser::new("Map<int, int> m, int f(1, 2), int c").unwrap();
        let end = parser.eof_index();
        let groups = parser.split_top_level(0, end);
        let texts: Vec<&str> = groups.iter().map(|&(s, e)| parser.text(s, e)).collect();
        assert_eq!(texts, vec!["Map<int, int> m", "int f(1, 2)", "int c"]);
    }
}
