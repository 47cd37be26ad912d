//! Declaration parsing implementation
//!
//! One method per declaration kind, each consuming exactly the tokens that
//! belong to its declaration:
//!
//! - Variables: `type decl [= init] (, decl)* ;`
//! - Functions: `type name(args) [qualifiers] ( ; | { body } [;] )`
//! - Constructors / destructors inside a class body
//! - Classes: `class Name [: bases] { public sections } [;]`
//! - Typedefs, `template <...>` and `inline` wrappers
//!
//! # Grammar
//!
//! ```text
//! variable    ::= type declarator ("," declarator)* ";"
//! declarator  ::= "*"* identifier ("[" expr? "]")* ["=" initializer]
//! function    ::= type name "(" [param ("," param)*] ")" qualifier* ending
//! param       ::= type [identifier] ("[" expr? "]")* ["=" default] | "..."
//! ending      ::= ";" | "{" ... "}" [";"]
//! ```
//!
//! Declarations that would produce an unusable binding are consumed but
//! dropped, and recorded as [`ParseError::UnsupportedType`] warnings.

use crate::parser::ast::{Class, Declaration, ExtendedType, Function, PointerSuffix, Type, Variable};
use crate::parser::error::{excerpt, ParseError};
use crate::parser::lexer::Token;
use crate::parser::parse::Parser;
use log::{debug, warn};

/// Parsed `name(args)` part of a function-like declaration
struct Signature {
    name: String,
    args: Vec<Variable>,
    variadic: bool,
}

impl Parser<'_> {
    /// Parse a variable declaration, possibly declaring several names
    pub(crate) fn parse_variable(&mut self) -> Result<Option<Declaration>, ParseError> {
        let first = self.position;
        let friend = self.peek().is_ident("friend");
        let kind = self.parse_type()?;
        let start = self.position;
        let end = self.find_top_level(start, |t| matches!(t, Token::Semicolon(_)));
        let declarators = self.text(start, end).to_string();

        // `struct Fwd;`, `friend class Bar;`, `struct Point { ... };`
        let placeholder = friend || matches!(kind, Type::Struct(_));
        if placeholder && (start == end || matches!(self.token_at(start), Token::LBrace(_))) {
            debug!("{} skipped", excerpt(self.text(first, end)));
            self.position = end;
            self.match_token(&Token::Semicolon(Default::default()));
            return Ok(None);
        }

        let mut names = Vec::new();
        let mut depths = Vec::new();
        for (group_start, group_end) in self.split_top_level(start, end) {
            let init = (group_start..group_end)
                .find(|&i| matches!(self.token_at(i), Token::Eq(_)))
                .unwrap_or(group_end);
            let name = (group_start..init)
                .find_map(|i| self.token_at(i).ident().map(str::to_string));
            let Some(name) = name else {
                self.position = group_start;
                return Err(self.unexpected("a variable name"));
            };
            names.push(name);
            depths.push(
                (group_start..init)
                    .filter(|&i| matches!(self.token_at(i), Token::RBracket(_)))
                    .count(),
            );
        }

        if names.is_empty() {
            return Err(self.unexpected("a variable name"));
        }
        if depths.iter().any(|&d| d != depths[0]) {
            return Err(ParseError::InconsistentArrayDepth { declarators });
        }

        let kind = match depths[0] {
            0 => kind,
            dims => kind.wrap(PointerSuffix::Array(dims)),
        };

        self.position = end;
        self.match_token(&Token::Semicolon(Default::default()));

        let variable = Variable::new(kind, names.join(", "), self.is_nested());
        if let Type::Named(_) | Type::Struct(_) | Type::Generic { .. } = variable.kind.base() {
            self.reject(&variable.name, &variable.kind.to_string());
            return Ok(None);
        }
        Ok(Some(Declaration::Variable(variable)))
    }

    /// Parse a function declaration or inline definition
    pub(crate) fn parse_function(&mut self) -> Result<Option<Declaration>, ParseError> {
        let kind = self.parse_type()?;
        let signature = self.parse_signature()?;
        self.skip_function_ending(&signature.name)?;

        Ok(self.check_arguments(kind.into(), signature))
    }

    /// Parse `ClassName(args)`, optionally with an initializer list and body
    pub(crate) fn parse_constructor(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.position = self.skip_function_specifiers_from(self.position);
        let signature = self.parse_signature()?;

        let class_name = self.class_name.clone().unwrap_or_default();
        if signature.name != class_name {
            return Err(ParseError::NameMismatch {
                class_name,
                found: signature.name,
            });
        }
        self.skip_function_ending(&signature.name)?;

        Ok(self.check_arguments(ExtendedType::Constructor, signature))
    }

    /// Destructors are consumed but never emitted
    pub(crate) fn parse_destructor(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.position = self.skip_function_specifiers_from(self.position);
        self.expect_token(&Token::Tilde(Default::default()), "'~' before destructor name")?;
        let signature = self.parse_signature()?;
        self.skip_function_ending(&format!("~{}", signature.name))?;
        Ok(None)
    }

    /// Parse class definition: class Name [: bases] { body } [;]
    pub(crate) fn parse_class(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.expect_token(&Token::Class(Default::default()), "'class'")?;
        let name = self.expect_identifier("a class name")?;

        // Base-class lists and `final` are skipped, inheritance is not modeled
        let open = self.find_top_level(self.position, |t| {
            matches!(t, Token::LBrace(_) | Token::Semicolon(_))
        });
        match self.token_at(open) {
            Token::Semicolon(_) => {
                debug!("forward declaration of class {} skipped", name);
                self.position = open + 1;
                return Ok(None);
            }
            Token::LBrace(_) => {}
            _ => {
                self.position = open;
                return Err(self.unexpected("'{' before class body"));
            }
        }

        let close = self.matching_close(open)?;
        let mut class = Class {
            name,
            members: Vec::new(),
        };

        for (start, end) in self.public_sections(open + 1, close) {
            let mut section = self.child(start, end, &class.name);
            while !section.is_at_end() {
                let Some(decl) = section.parse_item()? else {
                    continue;
                };
                let decl_name = decl.name().to_string();
                match decl.into_member() {
                    Some(member) => class.members.push(member),
                    None => debug!("nested class {} in {} not emitted", decl_name, class.name),
                }
            }
            self.warnings.extend(section.into_warnings());
        }

        self.position = close + 1;
        self.match_token(&Token::Semicolon(Default::default()));

        Ok(Some(Declaration::Class(class)))
    }

    /// Token ranges of every `public:` section between `start` and `end`.
    /// Class members are private until the first access label.
    fn public_sections(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut sections = Vec::new();
        let mut public_from = None;
        let mut depth = 0usize;
        let mut index = start;

        while index < end {
            let token = self.token_at(index);
            let is_label = depth == 0
                && matches!(token, Token::Public(_) | Token::Private(_) | Token::Protected(_))
                && matches!(self.token_at(index + 1), Token::Colon(_));

            if is_label {
                if let Some(from) = public_from.take() {
                    sections.push((from, index));
                }
                if matches!(token, Token::Public(_)) {
                    public_from = Some(index + 2);
                }
                index += 2;
                continue;
            }

            match token {
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) => depth += 1,
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            index += 1;
        }

        if let Some(from) = public_from {
            sections.push((from, end));
        }
        sections.retain(|&(from, to)| from < to);
        sections
    }

    /// Typedefs are skipped up to their terminating `;`
    pub(crate) fn parse_typedef(&mut self) -> Result<Option<Declaration>, ParseError> {
        let end = self.find_top_level(self.position, |t| matches!(t, Token::Semicolon(_)));
        if end == self.eof_index() {
            return Err(ParseError::UnexpectedEnd {
                expected: "';' after typedef".to_string(),
            });
        }
        self.position = end + 1;
        Ok(None)
    }

    /// `template <params>` followed by exactly one declaration
    pub(crate) fn parse_template(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.expect_token(&Token::Template(Default::default()), "'template'")?;
        if !self.check(&Token::Lt(Default::default())) {
            return Err(self.unexpected("'<' after template"));
        }
        let close = self.matching_close(self.position)?;
        self.position = close + 1;
        self.parse_item()
    }

    /// `inline` followed by exactly one declaration
    pub(crate) fn parse_inline(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.expect_token(&Token::Inline(Default::default()), "'inline'")?;
        self.parse_item()
    }

    /// Build the function, or drop it when an argument cannot be bound
    fn check_arguments(&mut self, kind: ExtendedType, signature: Signature) -> Option<Declaration> {
        if signature.variadic {
            self.reject(&signature.name, "...");
            return None;
        }
        for arg in &signature.args {
            let unsupported = match arg.kind.base() {
                Type::Generic { .. } => arg.kind.to_string(),
                Type::Struct(_) => format!("struct {}", arg.kind),
                _ => continue,
            };
            self.reject(&signature.name, &unsupported);
            return None;
        }

        Some(Declaration::Function(Function {
            kind,
            name: signature.name,
            args: signature.args,
            nested: self.is_nested(),
        }))
    }

    /// Function name and argument list, up to and including `)`
    fn parse_signature(&mut self) -> Result<Signature, ParseError> {
        let start = self.position;
        let mut angles = 0usize;
        let mut open = None;
        for index in start..self.eof_index() {
            match self.token_at(index) {
                Token::Lt(_) if !self.is_operator_symbol(index) => angles += 1,
                Token::Gt(_) if !self.is_operator_symbol(index) => angles = angles.saturating_sub(1),
                Token::LParen(_) if angles == 0 => {
                    open = Some(index);
                    break;
                }
                Token::Semicolon(_) | Token::LBrace(_) => break,
                _ => {}
            }
        }
        let Some(open) = open else {
            return Err(self.unexpected("'(' after function name"));
        };

        let name = self.text(start, open).to_string();
        if name.is_empty() {
            return Err(self.unexpected("a function name"));
        }

        let close = self.matching_close(open)?;
        let (args, variadic) = self.parse_arguments(open + 1, close)?;
        self.position = close + 1;

        Ok(Signature {
            name,
            args,
            variadic,
        })
    }

    /// Parse parameters in `tokens[start..end]`
    fn parse_arguments(&mut self, start: usize, end: usize) -> Result<(Vec<Variable>, bool), ParseError> {
        let mut args = Vec::new();
        let mut variadic = false;

        let groups = self.split_top_level(start, end);
        // (void) means no parameters
        if let &[(from, to)] = groups.as_slice() {
            if to == from + 1 && matches!(self.token_at(from), Token::Void(_)) {
                return Ok((args, variadic));
            }
        }

        for (from, to) in groups {
            if from == to {
                continue;
            }
            if matches!(self.token_at(from), Token::Ellipsis(_)) {
                variadic = true;
                continue;
            }

            self.position = from;
            let mut kind = self.parse_type()?;
            if self.position > to {
                return Err(ParseError::UnexpectedToken {
                    expected: "a parameter".to_string(),
                    found: excerpt(self.text(from, to)),
                    offset: self.token_at(from).span().start,
                });
            }

            let init = (self.position..to)
                .find(|&i| matches!(self.token_at(i), Token::Eq(_)))
                .unwrap_or(to);
            let name = (self.position..init)
                .find_map(|i| self.token_at(i).ident().map(str::to_string))
                .unwrap_or_default();
            let dims = (self.position..init)
                .filter(|&i| matches!(self.token_at(i), Token::LBracket(_)))
                .count();
            for _ in 0..dims {
                kind = kind.wrap(PointerSuffix::Unsized);
            }

            args.push(Variable::new(kind, name, true));
        }

        Ok((args, variadic))
    }

    /// Skip trailing qualifiers and the `;` or inline body ending a function
    fn skip_function_ending(&mut self, name: &str) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Token::Semicolon(_) => {
                    self.advance();
                    return Ok(());
                }
                Token::LBrace(_) => {
                    let close = self.matching_close(self.position)?;
                    self.position = close + 1;
                    self.match_token(&Token::Semicolon(Default::default()));
                    return Ok(());
                }
                Token::LParen(_) => {
                    // noexcept(...), initializer list arguments
                    let close = self.matching_close(self.position)?;
                    self.position = close + 1;
                }
                Token::Eof(_) => {
                    return Err(ParseError::FunctionEndNotFound {
                        name: name.to_string(),
                    });
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn reject(&mut self, declaration: &str, kind: &str) {
        let warning = ParseError::UnsupportedType {
            declaration: declaration.to_string(),
            kind: kind.to_string(),
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Member;
    use crate::parser::parse::parse_declarations;

    fn parse_one(code: &str) -> Option<Declaration> {
        let mut parser = Parser::new(code).unwrap();
        let item = parser.parse_item().unwrap();
        assert!(parser.is_at_end(), "unconsumed: {}", parser.remaining());
        item
    }

    fn var(kind: Type, name: &str) -> Option<Declaration> {
        Some(Declaration::Variable(Variable::new(kind, name, false)))
    }

    #[test]
    fn test_variable_list_shares_type() {
        assert_eq!(parse_one("double a, b = 2.0, c;"), var(Type::Double, "a, b, c"));
        assert_eq!(parse_one("int *p, q;"), var(Type::Int.pointer(), "p, q"));
    }

    #[test]
    fn test_variable_arrays() {
        assert_eq!(
            parse_one("int grid[3][4];"),
            var(Type::Int.wrap(PointerSuffix::Array(2)), "grid")
        );
        assert_eq!(
            parse_one("int a[2], b[3];"),
            var(Type::Int.wrap(PointerSuffix::Array(1)), "a, b")
        );
        assert_eq!(
            parse_one("int table[2] = {1, 2};"),
            var(Type::Int.wrap(PointerSuffix::Array(1)), "table")
        );
    }

    #[test]
    fn test_inconsistent_array_depth() {
        let mut parser = Parser::new("int a[2], b[2][3];").unwrap();
        let err = parser.parse_item().unwrap_err();
        assert!(matches!(err, ParseError::InconsistentArrayDepth { .. }));
    }

    #[test]
    fn test_named_variable_is_dropped_with_warning() {
        let mut parser = Parser::new("Widget w; int n;").unwrap();
        assert_eq!(parser.parse_item().unwrap(), None);
        assert_eq!(parser.remaining(), "int n;");
        assert_eq!(parser.warnings().len(), 1);
    }

    #[test]
    fn test_trailing_variable_without_terminator() {
        assert_eq!(parse_one("int last"), var(Type::Int, "last"));
    }

    #[test]
    fn test_function_arguments() {
        let decl = parse_one("double dot(const double* a, double b[], int n = 3);");
        let Some(Declaration::Function(f)) = decl else {
            panic!("Expected function");
        };
        assert_eq!(f.name, "dot");
        assert_eq!(f.kind, ExtendedType::Type(Type::Double));
        assert_eq!(
            f.args,
            vec![
                Variable::new(Type::Double.pointer(), "a", true),
                Variable::new(Type::Double.wrap(PointerSuffix::Unsized), "b", true),
                Variable::new(Type::Int, "n", true),
            ]
        );
        assert!(!f.nested);
    }

    #[test]
    fn test_void_and_unnamed_parameters() {
        let Some(Declaration::Function(f)) = parse_one("int tick(void);") else {
            panic!("Expected function");
        };
        assert!(f.args.is_empty());

        let Some(Declaration::Function(f)) = parse_one("void set(int, double);") else {
            panic!("Expected function");
        };
        assert_eq!(f.args[0], Variable::new(Type::Int, "", true));
        assert_eq!(f.args[1], Variable::new(Type::Double, "", true));
    }

    #[test]
    fn test_inline_body_is_skipped() {
        let decls = parse_declarations("int twice(int v) { if (v) { return 2 * v; } return 0; } int after;").unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].name(), "after");
    }

    #[test]
    fn test_function_endings() {
        let decls = parse_declarations("void a() {} void b() { }; void c(); int d;").unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_function_end_not_found() {
        let mut parser = Parser::new("void f() const").unwrap();
        let err = parser.parse_item().unwrap_err();
        assert_eq!(err, ParseError::FunctionEndNotFound { name: "f".to_string() });
    }

    #[test]
    fn test_generic_argument_drops_function() {
        let mut parser = Parser::new("void run(Vector<int> v); int n;").unwrap();
        assert_eq!(parser.parse_item().unwrap(), None);
        assert_eq!(parser.remaining(), "int n;");
        assert!(matches!(
            parser.warnings()[0],
            ParseError::UnsupportedType { ref declaration, .. } if declaration == "run"
        ));
    }

    #[test]
    fn test_pointer_to_generic_argument_drops_function() {
        assert_eq!(parse_one("void run(Vector<int>* v);"), None);
    }

    #[test]
    fn test_variadic_function_is_dropped() {
        assert_eq!(parse_one("int log_all(int level, ...);"), None);
    }

    #[test]
    fn test_generic_return_type_is_kept() {
        let Some(Declaration::Function(f)) = parse_one("std::vector<int> range(int n);") else {
            panic!("Expected function");
        };
        assert!(matches!(f.kind, ExtendedType::Type(Type::Generic { .. })));
    }

    #[test]
    fn test_class_public_members_only() {
        let decl = parse_one("class Foo { public: int x; Foo(int y); private: int z; };");
        let Some(Declaration::Class(class)) = decl else {
            panic!("Expected class");
        };
        assert_eq!(class.name, "Foo");
        assert_eq!(
            class.members,
            vec![
                Member::Variable(Variable::new(Type::Int, "x", true)),
                Member::Function(Function {
                    kind: ExtendedType::Constructor,
                    name: "Foo".to_string(),
                    args: vec![Variable::new(Type::Int, "y", true)],
                    nested: true,
                }),
            ]
        );
    }

    #[test]
    fn test_class_default_private_and_multiple_public_sections() {
        let Some(Declaration::Class(class)) = parse_one(
            "class Counter : public Base { int hidden; public: int get() const { return n; } \
             protected: int p; public: void reset(); };",
        ) else {
            panic!("Expected class");
        };
        let names: Vec<&str> = class.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["get", "reset"]);
    }

    #[test]
    fn test_destructor_is_not_a_member() {
        let Some(Declaration::Class(class)) =
            parse_one("class Foo { public: Foo(); ~Foo(); virtual ~Foo() {} double v; }")
        else {
            panic!("Expected class");
        };
        let names: Vec<&str> = class.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["Foo", "v"]);
    }

    #[test]
    fn test_constructor_with_initializer_list() {
        let Some(Declaration::Class(class)) =
            parse_one("class P { public: P(int a) : x(a), y(0) {} int x; };")
        else {
            panic!("Expected class");
        };
        assert_eq!(class.members.len(), 2);
    }

    #[test]
    fn test_constructor_name_mismatch() {
        let mut parser = Parser::in_class("Foo<int>(int a);", "Foo").unwrap();
        let err = parser.parse_item().unwrap_err();
        assert_eq!(
            err,
            ParseError::NameMismatch {
                class_name: "Foo".to_string(),
                found: "Foo<int>".to_string(),
            }
        );
    }

    #[test]
    fn test_forward_declaration_and_nested_class() {
        let decls = parse_declarations(
            "class Fwd; class Outer { public: class Inner { public: int i; }; int o; };",
        )
        .unwrap();
        assert_eq!(decls.len(), 1);
        let Declaration::Class(outer) = &decls[0] else {
            panic!("Expected class");
        };
        let names: Vec<&str> = outer.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["o"]);
    }

    #[test]
    fn test_typedef_template_inline() {
        let decls = parse_declarations(
            "typedef struct { int a; int b; } pair_t; \
             template <typename T, int N> T first(T* items); \
             inline double half(double v) { return v / 2; }",
        )
        .unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["first", "half"]);
    }

    #[test]
    fn test_template_wrapping_filtered_item() {
        let mut parser = Parser::new("template <class T> void put(Box<T> b); int n;").unwrap();
        assert_eq!(parser.parse_item().unwrap(), None);
        assert_eq!(parser.remaining(), "int n;");
    }

    #[test]
    fn test_struct_forward_declaration_and_definition_are_skipped() {
        let mut parser = Parser::new("struct Point; struct Pair { int a; int b; }; double norm(double x);").unwrap();
        let decls = parser.parse_declarations().unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["norm"]);
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn test_struct_variable_is_dropped_with_warning() {
        let mut parser = Parser::new("struct Point origin; int n;").unwrap();
        assert_eq!(parser.parse_item().unwrap(), None);
        assert_eq!(parser.remaining(), "int n;");
        assert_eq!(parser.warnings().len(), 1);
    }

    #[test]
    fn test_struct_argument_drops_function() {
        let mut parser = Parser::new("void draw(struct Point* p); int n;").unwrap();
        assert_eq!(parser.parse_item().unwrap(), None);
        assert_eq!(parser.remaining(), "int n;");
        assert_eq!(
            parser.warnings(),
            &[ParseError::UnsupportedType {
                declaration: "draw".to_string(),
                kind: "struct Point*".to_string(),
            }]
        );
    }

    #[test]
    fn test_friend_declarations_in_class() {
        let Some(Declaration::Class(class)) =
            parse_one("class Foo { public: friend class Bar; friend Baz; int x; };")
        else {
            panic!("Expected class");
        };
        let names: Vec<&str> = class.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_initializer_call_is_not_a_function() {
        assert_eq!(
            parse_one("const double PI = std::acos(-1.0);"),
            var(Type::Double, "PI")
        );
    }

    #[test]
    fn test_comparison_operators_are_methods() {
        let Some(Declaration::Class(class)) = parse_one(
            "class V { public: bool operator<(const V& o) const; bool operator==(const V& o) const; };",
        ) else {
            panic!("Expected class");
        };
        let names: Vec<&str> = class.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["operator<", "operator=="]);
        let Member::Function(less) = &class.members[0] else {
            panic!("Expected method");
        };
        assert_eq!(
            less.args,
            vec![Variable::new(
                Type::named("V").wrap(PointerSuffix::Reference),
                "o",
                true
            )]
        );
    }

    #[test]
    fn test_typedef_without_terminator() {
        let mut parser = Parser::new("typedef int count_t").unwrap();
        assert!(matches!(
            parser.parse_item().unwrap_err(),
            ParseError::UnexpectedEnd { .. }
        ));
    }
}
