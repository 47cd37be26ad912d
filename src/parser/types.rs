//! Type expression parsing
//!
//! ```text
//! type      ::= specifier* base ( "*" | "&" | "&&" | "const" )*
//! specifier ::= "extern" [string] | "const" | "static" | "virtual" | ...
//! base      ::= "void" | "int" | "double"
//!             | ("struct" | "class") name
//!             | modifier+ [ "int" | "double" | "char" ]     (unsigned long, ...)
//!             | name [ "<" arg ("," arg)* ">" ]
//! name      ::= ["::"] identifier ("::" identifier)*
//! ```
//!
//! Template arguments are kept as raw source strings.

use crate::parser::ast::{PointerSuffix, Type};
use crate::parser::error::ParseError;
use crate::parser::lexer::Token;
use crate::parser::parse::Parser;

/// Leading words that qualify a declaration without changing its type
const TYPE_SPECIFIERS: &[&str] = &[
    "static",
    "virtual",
    "explicit",
    "constexpr",
    "volatile",
    "mutable",
    "friend",
];

/// Builtin type words that combine into one opaque name
const TYPE_MODIFIERS: &[&str] = &["unsigned", "signed", "short", "long"];

impl Parser<'_> {
    /// Parse type: specifiers, base type, then pointer/reference markers
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.skip_type_specifiers();

        let mut kind = match self.peek() {
            Token::Void(_) => {
                self.advance();
                Type::Void
            }
            Token::Int(_) => {
                self.advance();
                Type::Int
            }
            Token::Double(_) => {
                self.advance();
                Type::Double
            }
            Token::Struct(_) | Token::Class(_) => {
                self.advance();
                Type::Struct(self.parse_qualified_name()?)
            }
            Token::Ident(word, _) if TYPE_MODIFIERS.contains(&word.as_str()) => {
                self.parse_builtin_words()
            }
            Token::Ident(..) | Token::ColonColon(_) => {
                let name = self.parse_qualified_name()?;
                if self.check(&Token::Lt(Default::default())) {
                    self.parse_generic(name)?
                } else {
                    Type::Named(name)
                }
            }
            _ => return Err(self.unexpected("a type")),
        };

        loop {
            match self.peek() {
                Token::Star(_) => {
                    self.advance();
                    kind = kind.pointer();
                }
                Token::Amp(_) => {
                    self.advance();
                    self.match_token(&Token::Amp(Default::default()));
                    kind = kind.wrap(PointerSuffix::Reference);
                }
                Token::Const(_) => {
                    self.advance();
                }
                _ => break,
            }
        }

        Ok(kind)
    }

    /// Strip `extern`, `extern "C"`, `const` and the other specifiers in any order
    fn skip_type_specifiers(&mut self) {
        loop {
            match self.peek() {
                Token::Extern(_) => {
                    self.advance();
                    if matches!(self.peek(), Token::StringLiteral(..)) {
                        self.advance();
                    }
                }
                Token::Const(_) => {
                    self.advance();
                }
                Token::Ident(word, _) if TYPE_SPECIFIERS.contains(&word.as_str()) => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// `Foo`, `std::string`, `::Global`
    pub(crate) fn parse_qualified_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        if self.match_token(&Token::ColonColon(Default::default())) {
            name.push_str("::");
        }
        name.push_str(&self.expect_identifier("a type name")?);

        while self.check(&Token::ColonColon(Default::default()))
            && matches!(self.peek_ahead(1), Token::Ident(..))
        {
            self.advance();
            name.push_str("::");
            name.push_str(&self.expect_identifier("a type name")?);
        }

        Ok(name)
    }

    /// `unsigned long`, `long double`, `short int`, ...
    fn parse_builtin_words(&mut self) -> Type {
        let mut words = Vec::new();
        loop {
            let word = match self.peek() {
                Token::Ident(word, _) if TYPE_MODIFIERS.contains(&word.as_str()) => word.clone(),
                Token::Ident(word, _) if word == "char" && !words.is_empty() => word.clone(),
                Token::Int(_) if !words.is_empty() => "int".to_string(),
                Token::Double(_) if !words.is_empty() => "double".to_string(),
                _ => break,
            };
            words.push(word);
            self.advance();
        }
        Type::Named(words.join(" "))
    }

    /// Template instantiation starting at `<`
    fn parse_generic(&mut self, name: String) -> Result<Type, ParseError> {
        let open = self.position;
        let close = self.matching_close(open)?;
        let type_args = self
            .split_top_level(open + 1, close)
            .into_iter()
            .map(|(start, end)| self.text(start, end).to_string())
            .filter(|arg| !arg.is_empty())
            .collect();
        self.position = close + 1;
        Ok(Type::Generic { name, type_args })
    }
}

/// Parse a leading type expression, returning it with the trimmed remaining text
pub fn parse_type(code: &str) -> Result<(Type, &str), ParseError> {
    let mut parser = Parser::new(code)?;
    let kind = parser.parse_type()?;
    Ok((kind, parser.remaining()))
}
