// Declaration model for the public surface of a C++ header

/// Byte range of a token in the text it was lexed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// How a [`Type::Pointer`] wraps its inner type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSuffix {
    Star,             // T*
    Reference,        // T&
    Array(usize),     // variable arrays, all dimensions in one wrap
    Unsized,          // one `[]` on a parameter
}

/// Type representation of a declaration or parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    Int,
    Double,
    Named(String),  // opaque user type
    Struct(String), // `struct X` / `class X` used as a type
    Pointer {
        inner: Box<Type>,
        suffix: PointerSuffix,
    },
    Generic {
        name: String,
        type_args: Vec<String>,
    },
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn pointer(self) -> Self {
        self.wrap(PointerSuffix::Star)
    }

    pub fn wrap(self, suffix: PointerSuffix) -> Self {
        Type::Pointer {
            inner: Box::new(self),
            suffix,
        }
    }

    /// The type underneath every pointer/array/reference wrap
    pub fn base(&self) -> &Type {
        let mut current = self;
        while let Type::Pointer { inner, .. } = current {
            current = inner;
        }
        current
    }
}

/// A function's return slot: a real type or one of the special member markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedType {
    Type(Type),
    Constructor,
    Destructor,
}

impl From<Type> for ExtendedType {
    fn from(kind: Type) -> Self {
        ExtendedType::Type(kind)
    }
}

/// Module-level variable or class data member.
///
/// `name` holds every declarator of the declaration joined by `", "`,
/// since `int a, b;` shares one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub kind: Type,
    pub name: String,
    pub nested: bool,
}

impl Variable {
    pub fn new(kind: Type, name: impl Into<String>, nested: bool) -> Self {
        Self {
            kind,
            name: name.into(),
            nested,
        }
    }
}

/// Free function, method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub kind: ExtendedType,
    pub name: String,
    pub args: Vec<Variable>,
    pub nested: bool,
}

impl Function {
    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, ExtendedType::Constructor)
    }
}

/// A class member that survived public-section extraction and filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Variable(Variable),
    Function(Function),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Variable(v) => &v.name,
            Member::Function(f) => &f.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub members: Vec<Member>,
}

/// One parsed unit of header content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Variable(Variable),
    Function(Function),
    Class(Class),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable(v) => &v.name,
            Declaration::Function(f) => &f.name,
            Declaration::Class(c) => &c.name,
        }
    }

    /// Convert to a class member; classes nested in a class body have no member form
    pub fn into_member(self) -> Option<Member> {
        match self {
            Declaration::Variable(v) => Some(Member::Variable(v)),
            Declaration::Function(f) => Some(Member::Function(f)),
            Declaration::Class(_) => None,
        }
    }
}
