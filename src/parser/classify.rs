//! Declaration classification
//!
//! Pure lookahead over the token stream: decides which kind of declaration
//! starts at the parser's position without consuming anything. Rules apply in
//! priority order:
//!
//! 1. the enclosing class name followed by `(` → constructor
//! 2. `~ClassName` → destructor
//! 3. `template` / `inline` / `typedef` / `class` keywords
//! 4. otherwise the first top-level `;` against the first `(` outside
//!    template arguments and initializers: a `(` before the terminator means
//!    a function

use crate::parser::error::ParseError;
use crate::parser::lexer::Token;
use crate::parser::parse::Parser;

/// Specifiers that may precede a constructor or destructor name
pub(crate) const FUNCTION_SPECIFIERS: &[&str] = &["explicit", "virtual", "constexpr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Function,
    Class,
    Template,
    Inline,
    Typedef,
    Constructor,
    Destructor,
}

impl Parser<'_> {
    /// Decide which declaration kind starts at the current position
    pub fn classify(&self) -> DeclKind {
        if let Some(class_name) = self.class_name.as_deref() {
            let start = self.skip_function_specifiers_from(self.position);
            if self.is_constructor_at(start, class_name) {
                return DeclKind::Constructor;
            }
            if matches!(self.token_at(start), Token::Tilde(_))
                && self.token_at(start + 1).is_ident(class_name)
            {
                return DeclKind::Destructor;
            }
        }

        match self.peek() {
            Token::Template(_) => return DeclKind::Template,
            Token::Inline(_) => return DeclKind::Inline,
            Token::Typedef(_) => return DeclKind::Typedef,
            Token::Class(_) => return DeclKind::Class,
            _ => {}
        }

        let (semicolon, paren) = self.first_terminator_and_paren();
        match (semicolon, paren) {
            (None, Some(_)) => DeclKind::Function,
            (None, None) => DeclKind::Variable,
            (Some(_), None) => DeclKind::Variable,
            (Some(semi), Some(paren)) if semi < paren => DeclKind::Variable,
            (Some(_), Some(_)) => DeclKind::Function,
        }
    }

    /// Index after any leading function specifiers
    pub(crate) fn skip_function_specifiers_from(&self, from: usize) -> usize {
        let mut index = from;
        while FUNCTION_SPECIFIERS
            .iter()
            .any(|spec| self.token_at(index).is_ident(spec))
        {
            index += 1;
        }
        index
    }

    /// `ClassName` with no other identifier before the opening parenthesis
    fn is_constructor_at(&self, start: usize, class_name: &str) -> bool {
        if !self.token_at(start).is_ident(class_name) {
            return false;
        }
        for index in start + 1..self.tokens.len() {
            match self.token_at(index) {
                Token::LParen(_) => return true,
                Token::Ident(..) | Token::Semicolon(_) | Token::Eof(_) => return false,
                _ => {}
            }
        }
        false
    }

    /// Positions of the first `;` outside braces and of the first `(` outside
    /// braces and template angle brackets, scanning up to that `;`. A `(` in
    /// an initializer (`= f(x)`) does not count.
    fn first_terminator_and_paren(&self) -> (Option<usize>, Option<usize>) {
        let mut braces = 0usize;
        let mut angles = 0usize;
        let mut paren = None;
        let mut initializer = false;

        for index in self.position..self.eof_index() {
            let top_level = braces == 0 && !self.is_operator_symbol(index);
            match self.token_at(index) {
                Token::LBrace(_) => braces += 1,
                Token::RBrace(_) => braces = braces.saturating_sub(1),
                Token::Lt(_) if top_level => angles += 1,
                Token::Gt(_) if top_level => angles = angles.saturating_sub(1),
                Token::Eq(_) if top_level && angles == 0 && paren.is_none() => initializer = true,
                Token::LParen(_) if braces == 0 && angles == 0 && paren.is_none() && !initializer => {
                    paren = Some(index);
                }
                Token::Semicolon(_) if braces == 0 => return (Some(index), paren),
                _ => {}
            }
        }
        (None, paren)
    }
}

/// Classify the declaration at the start of `code`
pub fn classify(code: &str, class_name: Option<&str>) -> Result<DeclKind, ParseError> {
    let parser = match class_name {
        Some(name) => Parser::in_class(code, name)?,
        None => Parser::new(code)?,
    };
    Ok(parser.classify())
}
