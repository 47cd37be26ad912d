//! C++ header parser
//!
//! This module turns the text of a C++ header into the declaration model that
//! the stub emitter renders:
//! - [`normalize`]: line cleanup, comment stripping (raw text → one logical line)
//! - [`namespace`]: extraction of the single optional namespace body
//! - [`lexer`]: tokenization (text → tokens with byte spans)
//! - [`parse`]: the [`Parser`] and its item loop (tokens → declarations)
//! - [`ast`]: declaration and type definitions
//!
//! # Supported C++ subset
//!
//! Only the public surface that has a binding form is modeled:
//! - Free functions and module-level variables of `void`, `int`, `double`,
//!   opaque named types, pointers, references and arrays
//! - Classes with their `public:` members and constructors
//! - `template <...>` and `inline` wrappers around one declaration
//! - At most one namespace per header
//!
//! Typedefs, destructors, private members and nested classes are consumed and
//! left out. No macro expansion, no inheritance, no overload resolution.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over the token stream. Lookahead decides the
//! declaration kind (see [`classify`]) and every kind consumes exactly its own
//! tokens, so the remaining text is always the start of the next declaration.

pub mod ast;
pub mod classify;
mod declarations;
pub mod delimiters;
pub mod error;
pub mod lexer;
pub mod namespace;
pub mod normalize;
pub mod parse;
mod types;

pub use ast::{Class, Declaration, ExtendedType, Function, Member, PointerSuffix, Span, Type, Variable};
pub use classify::{classify, DeclKind};
pub use delimiters::{match_delimiters, Delimiter, Matched};
pub use error::ParseError;
pub use namespace::extract_namespace;
pub use normalize::{clean_lines, normalize};
pub use parse::{parse_declarations, parse_header, parse_item, ParsedHeader, Parser};
pub use types::parse_type;
