//! Cython rendering of parsed declarations
//!
//! Variables render on one line. Function signatures are word-wrapped at
//! [`LINE_WIDTH`] columns, breaking only between the keyword, the return type,
//! the name and the parameters, never inside a parameter. Class members are
//! indented one level below their `cdef cppclass` line.

use crate::parser::ast::{Class, Declaration, ExtendedType, Function, Member, PointerSuffix, Type, Variable};
use std::fmt;

pub const LINE_WIDTH: usize = 80;

const INDENT: &str = "  ";
const CONTINUATION_INDENT: &str = "    ";

impl fmt::Display for PointerSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerSuffix::Star => write!(f, "*"),
            PointerSuffix::Reference => write!(f, "&"),
            PointerSuffix::Array(dims) => write!(f, "[{}]", vec![":"; *dims].join(",")),
            PointerSuffix::Unsized => write!(f, "[]"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Named(name) | Type::Struct(name) => write!(f, "{}", name),
            Type::Pointer { inner, suffix } => write!(f, "{}{}", inner, suffix),
            Type::Generic { name, type_args } => write!(f, "{}[{}]", name, type_args.join(", ")),
        }
    }
}

impl fmt::Display for ExtendedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedType::Type(kind) => write!(f, "{}", kind),
            ExtendedType::Constructor => Ok(()),
            ExtendedType::Destructor => write!(f, "~"),
        }
    }
}

/// `  cdef int x` at top level, `  int x` inside a class
pub fn render_variable(variable: &Variable) -> String {
    if variable.nested {
        format!("{}{} {}", INDENT, variable.kind, variable.name)
    } else {
        format!("{}cdef {} {}", INDENT, variable.kind, variable.name)
    }
}

/// One parameter of a signature; unnamed parameters render as the bare type
fn render_parameter(arg: &Variable) -> String {
    format!("{} {}", arg.kind, arg.name).trim().to_string()
}

/// Function or constructor signature, wrapped to [`LINE_WIDTH`]
pub fn render_function(function: &Function) -> String {
    let mut words: Vec<String> = Vec::new();
    if !function.nested {
        words.push("cdef".to_string());
    }
    words.extend(function.kind.to_string().split_whitespace().map(str::to_string));

    let mut call = format!("{}(", function.name);
    for (i, arg) in function.args.iter().enumerate() {
        if i > 0 {
            call.push(',');
            words.push(std::mem::take(&mut call));
        }
        call.push_str(&render_parameter(arg));
    }
    call.push(')');
    if function.is_constructor() {
        call.push_str(" except +");
    }
    words.push(call);

    wrap_words(&words, LINE_WIDTH, INDENT, CONTINUATION_INDENT).join("\n")
}

/// `cdef cppclass` block with every member one level deeper
pub fn render_class(class: &Class) -> String {
    let mut out = format!("{}cdef cppclass {}:", INDENT, class.name);
    if class.members.is_empty() {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(INDENT);
        out.push_str("pass");
        return out;
    }

    for member in &class.members {
        let rendered = match member {
            Member::Variable(variable) => render_variable(variable),
            Member::Function(function) => render_function(function),
        };
        for line in rendered.lines() {
            out.push('\n');
            out.push_str(INDENT);
            out.push_str(line);
        }
    }
    out
}

pub fn render_declaration(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Variable(variable) => render_variable(variable),
        Declaration::Function(function) => render_function(function),
        Declaration::Class(class) => render_class(class),
    }
}

/// Greedy word wrap. Words are never split; a word wider than the line gets a
/// line of its own.
pub fn wrap_words<S: AsRef<str>>(words: &[S], width: usize, initial: &str, subsequent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::from(initial);
    let mut empty = true;

    for word in words.iter().map(AsRef::as_ref) {
        if !empty && line.len() + 1 + word.len() > width {
            lines.push(std::mem::replace(&mut line, String::from(subsequent)));
            empty = true;
        }
        if !empty {
            line.push(' ');
        }
        line.push_str(word);
        empty = false;
    }

    if !empty {
        lines.push(line);
    }
    lines
}
