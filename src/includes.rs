//! `#include` resolution
//!
//! Quoted includes of a header (and of its sibling source file) become Cython
//! `cimport` module identifiers anchored on the folder the stub is written to:
//! `#include "../util/vec.hpp"` seen from stub folder `pkg/geom` resolves to
//! `pkg.util.vec`. System includes (`<...>`) have no stub and are skipped.

use crate::parser::error::ParseError;
use crate::parser::normalize::clean_lines;
use std::path::{Component, Path, PathBuf};

/// Resolve one `#include` line to a module identifier.
///
/// Returns `Ok(None)` for angle-bracket includes and for the header named
/// `exclude` (a source file including its own header).
pub fn resolve_include(line: &str, exclude: &str, folder: &Path) -> Result<Option<String>, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let &[_, target] = parts.as_slice() else {
        return Err(ParseError::MalformedInclude {
            line: line.trim().to_string(),
        });
    };

    let Some(header) = target
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return Ok(None);
    };

    let header = Path::new(header.trim());
    if header.file_name().is_some_and(|name| name == exclude) {
        return Ok(None);
    }

    let module = normalize_path(&folder.join(header).with_extension(""));
    let parts: Vec<String> = module
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(Some(parts.join(".")))
}

/// Resolve every `#include` line of a raw header or source file
pub fn find_includes(text: &str, exclude: &str, folder: &Path) -> Result<Vec<String>, ParseError> {
    let mut includes = Vec::new();
    for line in clean_lines(text) {
        if !line.starts_with("#include") {
            continue;
        }
        if let Some(module) = resolve_include(line, exclude, folder)? {
            includes.push(module);
        }
    }
    Ok(includes)
}

/// Collapse `.` and `..` without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#include \"vec.hpp\"", ".", Some("vec"))]
    #[case("#include \"geom/vec.hpp\"", "pkg", Some("pkg.geom.vec"))]
    #[case("#include \"geom/../util/vec.hpp\"", "pkg", Some("pkg.util.vec"))]
    #[case("#include \"../util/vec.hpp\"", "pkg/geom", Some("pkg.util.vec"))]
    #[case("#include \"./vec.h\"", "pkg", Some("pkg.vec"))]
    #[case("#include <vector>", "pkg", None)]
    #[case("#include \"shapes.hpp\"", "pkg", None)]
    #[case("#include \"other/shapes.hpp\"", "pkg", None)]
    fn test_resolve_include(#[case] line: &str, #[case] folder: &str, #[case] expected: Option<&str>) {
        let module = resolve_include(line, "shapes.hpp", Path::new(folder)).unwrap();
        assert_eq!(module.as_deref(), expected);
    }

    #[rstest]
    #[case("#include")]
    #[case("#include \"a.hpp\" \"b.hpp\"")]
    #[case("#include\"a.hpp\"")]
    fn test_malformed_include(#[case] line: &str) {
        let err = resolve_include(line, "shapes.hpp", Path::new(".")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedInclude { .. }));
    }

    #[test]
    fn test_find_includes_skips_comments_and_other_lines() {
        let text = "#pragma once\n#include <cmath>\n#include \"point.hpp\" // coordinates\n\
                    // #include \"ignored.hpp\"\nint x;\n#include \"shapes.hpp\"\n";
        let includes = find_includes(text, "shapes.hpp", Path::new("geo")).unwrap();
        assert_eq!(includes, vec!["geo.point".to_string()]);
    }
}
