//! # Introduction
//!
//! hpp2pxd reads C++ headers and writes Cython `.pxd` declaration stubs
//! exposing their public surface: free functions, module-level variables and
//! the public members of classes.
//!
//! ## Pipeline
//!
//! ```text
//! Header → Normalizer → Namespace → Lexer → Parser → Declarations → Stub
//! ```
//!
//! 1. [`parser`] flattens the header, extracts its namespace, tokenizes it and
//!    parses the declarations that have a binding form.
//! 2. [`includes`] turns quoted `#include` lines into `cimport` modules.
//! 3. [`stub`] renders the declarations into the `.pxd` file layout.
//! 4. [`driver`] maps header paths to stub paths, runs the steps above for
//!    one header, and runs many headers in parallel.
//!
//! ```
//! use hpp2pxd::parser::parse_header;
//!
//! let header = parse_header("namespace geo { double area(double r); }").unwrap();
//! assert_eq!(header.namespace.as_deref(), Some("geo"));
//! assert_eq!(header.declarations.len(), 1);
//! ```

pub mod cli;
pub mod driver;
pub mod includes;
pub mod parser;
pub mod stub;

pub use driver::{collect_headers, generate_stub, run_batch, StubError, StubJob, StubOptions, StubSummary};
pub use parser::{parse_header, Declaration, ParseError, ParsedHeader};
