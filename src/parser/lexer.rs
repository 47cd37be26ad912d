//! Lexer (tokenizer) for C++ header declarations
//!
//! Converts normalized header text into a flat [`Token`] stream consumed by the
//! declaration classifier and parser. Every token keeps the byte [`Span`] it
//! came from, so the parser can always hand back the unconsumed remainder of
//! the source text. Comments and preprocessor lines are skipped if present.

use super::ast::Span;
use super::error::ParseError;
use std::fmt;

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(String, Span),
    StringLiteral(String, Span),
    CharLiteral(String, Span),

    // Identifiers
    Ident(String, Span),

    // Keywords
    Void(Span),
    Int(Span),
    Double(Span),
    Extern(Span),
    Const(Span),
    Class(Span),
    Struct(Span),
    Template(Span),
    Inline(Span),
    Typedef(Span),
    Public(Span),
    Private(Span),
    Protected(Span),

    // Punctuation
    LParen(Span),    // (
    RParen(Span),    // )
    LBrace(Span),    // {
    RBrace(Span),    // }
    LBracket(Span),  // [
    RBracket(Span),  // ]
    Lt(Span),        // <
    Gt(Span),        // >
    Star(Span),      // *
    Amp(Span),       // &
    Comma(Span),     // ,
    Semicolon(Span), // ;
    Colon(Span),     // :
    ColonColon(Span), // ::
    Tilde(Span),     // ~
    Eq(Span),        // =
    Ellipsis(Span),  // ...

    // Anything else (operators in default values, etc.)
    Symbol(char, Span),

    // End of input
    Eof(Span),
}

impl Token {
    /// Returns the byte span this token covers.
    pub fn span(&self) -> Span {
        match self {
            Token::Number(_, span)
            | Token::StringLiteral(_, span)
            | Token::CharLiteral(_, span)
            | Token::Ident(_, span)
            | Token::Symbol(_, span)
            | Token::Void(span)
            | Token::Int(span)
            | Token::Double(span)
            | Token::Extern(span)
            | Token::Const(span)
            | Token::Class(span)
            | Token::Struct(span)
            | Token::Template(span)
            | Token::Inline(span)
            | Token::Typedef(span)
            | Token::Public(span)
            | Token::Private(span)
            | Token::Protected(span)
            | Token::LParen(span)
            | Token::RParen(span)
            | Token::LBrace(span)
            | Token::RBrace(span)
            | Token::LBracket(span)
            | Token::RBracket(span)
            | Token::Lt(span)
            | Token::Gt(span)
            | Token::Star(span)
            | Token::Amp(span)
            | Token::Comma(span)
            | Token::Semicolon(span)
            | Token::Colon(span)
            | Token::ColonColon(span)
            | Token::Tilde(span)
            | Token::Eq(span)
            | Token::Ellipsis(span)
            | Token::Eof(span) => *span,
        }
    }

    /// Identifier text, if this is an identifier
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(name, _) => Some(name),
            _ => None,
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.ident() == Some(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::CharLiteral(s, _) => write!(f, "char literal '{}'", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Void(_) => write!(f, "'void'"),
            Token::Int(_) => write!(f, "'int'"),
            Token::Double(_) => write!(f, "'double'"),
            Token::Extern(_) => write!(f, "'extern'"),
            Token::Const(_) => write!(f, "'const'"),
            Token::Class(_) => write!(f, "'class'"),
            Token::Struct(_) => write!(f, "'struct'"),
            Token::Template(_) => write!(f, "'template'"),
            Token::Inline(_) => write!(f, "'inline'"),
            Token::Typedef(_) => write!(f, "'typedef'"),
            Token::Public(_) => write!(f, "'public'"),
            Token::Private(_) => write!(f, "'private'"),
            Token::Protected(_) => write!(f, "'protected'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::ColonColon(_) => write!(f, "'::'"),
            Token::Tilde(_) => write!(f, "'~'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Ellipsis(_) => write!(f, "'...'"),
            Token::Symbol(c, _) => write!(f, "'{}'", c),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer for C++ declaration text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
}

impl Lexer {
    /// Create a new lexer for the given text.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
        }
    }

    /// Tokenize the entire input; the last token is always [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(Span::new(self.offset, self.offset)));
                break;
            }

            if self.peek() == Some('#') {
                self.skip_preprocessor_directive();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.offset;
        let Some(ch) = self.advance() else {
            return Ok(Token::Eof(Span::new(start, start)));
        };

        let token: fn(Span) -> Token = match ch {
            '"' => return self.quoted_literal('"', start),
            '\'' => return self.quoted_literal('\'', start),
            '0'..='9' => return Ok(self.number_literal(ch, start)),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, start)),

            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    Token::ColonColon
                } else {
                    Token::Colon
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Token::Ellipsis
                } else {
                    return Ok(Token::Symbol('.', self.span_from(start)));
                }
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            // `>>` stays two tokens so nested template lists close one at a time
            '<' => Token::Lt,
            '>' => Token::Gt,
            '*' => Token::Star,
            '&' => Token::Amp,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '~' => Token::Tilde,
            '=' => Token::Eq,
            other => return Ok(Token::Symbol(other, self.span_from(start))),
        };

        Ok(token(self.span_from(start)))
    }

    /// String or character literal; escapes are kept verbatim
    fn quoted_literal(&mut self, quote: char, start: usize) -> Result<Token, ParseError> {
        let mut text = String::new();

        while let Some(ch) = self.advance() {
            if ch == quote {
                let span = self.span_from(start);
                return Ok(if quote == '"' {
                    Token::StringLiteral(text, span)
                } else {
                    Token::CharLiteral(text, span)
                });
            }
            text.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.advance() {
                    text.push(escaped);
                }
            }
        }

        Err(ParseError::UnterminatedLiteral { offset: start })
    }

    /// Numeric literal, including suffixes and fractional parts (`1.5f`, `0x1F`)
    fn number_literal(&mut self, first_digit: char, start: usize) -> Token {
        let mut num = String::new();
        num.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
                num.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Number(num, self.span_from(start))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, start: usize) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start);
        match ident.as_str() {
            "void" => Token::Void(span),
            "int" => Token::Int(span),
            "double" => Token::Double(span),
            "extern" => Token::Extern(span),
            "const" => Token::Const(span),
            "class" => Token::Class(span),
            "struct" => Token::Struct(span),
            "template" => Token::Template(span),
            "inline" => Token::Inline(span),
            "typedef" => Token::Typedef(span),
            "public" => Token::Public(span),
            "private" => Token::Private(span),
            "protected" => Token::Protected(span),
            _ => Token::Ident(ident, span),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.offset;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(ParseError::MalformedComment { offset: start })
    }

    /// Skip preprocessor directive (#include, etc.)
    fn skip_preprocessor_directive(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.offset)
    }
}
