//! Cython `.pxd` stub emitter
//!
//! [`StubWriter`] lays out one stub file: the file banner and compiler
//! directives, `cimport` lines for resolved includes, the optional block for
//! the sibling C++ source file, and finally the `cdef extern from` block that
//! holds every rendered declaration (see [`render`]).

pub mod render;

use crate::parser::ast::Declaration;
use std::fmt::{self, Write};
use std::path::Path;

pub use render::{render_class, render_declaration, render_function, render_variable, LINE_WIDTH};

const RULE: &str = "----------------------------------------------------------------------------";

/// Layout of one `.pxd` file
#[derive(Debug, Clone)]
pub struct StubWriter<'a> {
    header: &'a Path,
    source: Option<&'a Path>,
    includes: &'a [String],
    namespace: Option<&'a str>,
    show_content: bool,
}

impl<'a> StubWriter<'a> {
    pub fn new(header: &'a Path) -> Self {
        Self {
            header,
            source: None,
            includes: &[],
            namespace: None,
            show_content: true,
        }
    }

    /// Sibling `.cpp` file, declared in the source section when present
    pub fn source(mut self, source: Option<&'a Path>) -> Self {
        self.source = source;
        self
    }

    /// Module identifiers emitted as `cimport` lines, in the given order
    pub fn includes(mut self, includes: &'a [String]) -> Self {
        self.includes = includes;
        self
    }

    pub fn namespace(mut self, namespace: Option<&'a str>) -> Self {
        self.namespace = namespace;
        self
    }

    /// When false the extern block is left empty (`pass`) whatever was parsed
    pub fn show_content(mut self, show: bool) -> Self {
        self.show_content = show;
        self
    }

    pub fn render(&self, declarations: &[Declaration]) -> String {
        Stub {
            writer: self,
            declarations,
        }
        .to_string()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, declarations: &[Declaration]) -> fmt::Result {
        let stem = self
            .header
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        writeln!(out, "# File: {}.pxd", stem)?;
        writeln!(out, "# distutils: language = c++")?;
        writeln!(out, "# cython: language_level=3")?;
        writeln!(out)?;
        writeln!(out)?;
        write_docstring_banner(out, "C++ Source Files")?;
        writeln!(out)?;

        for include in self.includes {
            writeln!(out, "cimport {}", include)?;
        }
        writeln!(out)?;

        if let Some(source) = self.source {
            writeln!(out)?;
            writeln!(out, "cdef extern from r\"{}\":", source.display())?;
            writeln!(out, "  pass")?;
        }

        writeln!(out)?;
        write_docstring_banner(out, "End of Source Files")?;
        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "# {}--", RULE)?;
        writeln!(out, "# C++ Header files + exported definitions")?;
        writeln!(out, "# {}--", RULE)?;
        writeln!(out)?;

        match self.namespace {
            Some(ns) => writeln!(out, "cdef extern from r\"{}\" namespace \"{}\":", self.header.display(), ns)?,
            None => writeln!(out, "cdef extern from r\"{}\":", self.header.display())?,
        }

        if self.show_content && !declarations.is_empty() {
            for declaration in declarations {
                write!(out, "{}\n\n", render_declaration(declaration))?;
            }
        } else {
            writeln!(out, "  pass")?;
        }
        Ok(())
    }
}

fn write_docstring_banner<W: Write>(out: &mut W, title: &str) -> fmt::Result {
    writeln!(out, "\"\"\" {}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{} \"\"\"", RULE)
}

/// A writer bound to the declarations it renders
struct Stub<'w, 'a> {
    writer: &'w StubWriter<'a>,
    declarations: &'w [Declaration],
}

impl fmt::Display for Stub<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.writer.write_to(f, self.declarations)
    }
}
