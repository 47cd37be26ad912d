// Integration tests for stub generation on disk

use std::fs;
use std::path::{Path, PathBuf};

use hpp2pxd::{collect_headers, generate_stub, run_batch, StubError, StubJob, StubOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SHAPES_HPP: &str = r#"#pragma once
#include <cmath>
#include "point.hpp"

namespace geo {

class Circle {
  public:
    Circle(double r);
    double area() const;
    double r;
};

double distance(Point* a, Point* b);

}
"#;

const SHAPES_CPP: &str = r#"#include "shapes.hpp"
#include "../util/log.hpp"

namespace geo {
Circle::Circle(double r) : r(r) {}
}
"#;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().expect("File has a parent")).expect("Create dir failed");
    fs::write(path, text).expect("Write failed");
}

fn homes(dir: &TempDir) -> StubOptions {
    StubOptions {
        cpp_home: Some(dir.path().join("src")),
        cython_home: Some(dir.path().join("pyx")),
        ..StubOptions::default()
    }
}

#[test]
fn test_generate_stub_mirrors_tree() {
    let dir = TempDir::new().expect("Temp dir");
    let header = dir.path().join("src/geo/shapes.hpp");
    let source = dir.path().join("src/geo/shapes.cpp");
    write(&header, SHAPES_HPP);
    write(&source, SHAPES_CPP);

    let opts = homes(&dir);
    let job = StubJob::new(&header, &opts).expect("Job creation failed");
    assert_eq!(job.stub_file, dir.path().join("pyx/geo/shapes.pxd"));

    let summary = generate_stub(&job, &opts).expect("Stub generation failed");
    assert_eq!(summary.namespace.as_deref(), Some("geo"));
    assert_eq!(summary.declarations, 2);
    assert!(summary.warnings.is_empty());

    let pyx = dir.path().join("pyx");
    let module = |parts: &[&str]| {
        let mut path = pyx.clone();
        path.extend(parts);
        path.components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    };
    assert_eq!(
        summary.includes,
        vec![module(&["geo", "point"]), module(&["util", "log"])]
    );

    let stub = fs::read_to_string(&job.stub_file).expect("Stub was written");
    assert!(stub.starts_with("# File: shapes.pxd\n# distutils: language = c++\n"));
    assert!(stub.contains(&format!("cimport {}\n", module(&["geo", "point"]))));
    assert!(stub.contains(&format!("cdef extern from r\"{}\":\n  pass\n", source.display())));

    let extern_block = format!(
        "cdef extern from r\"{}\" namespace \"geo\":\n",
        header.display()
    );
    let body = stub.split(&extern_block).nth(1).expect("Extern block present");
    assert_eq!(
        body,
        "  cdef cppclass Circle:\n    Circle(double r) except +\n    double area()\n    double r\n\n\
         \x20 cdef double distance(Point* a, Point* b)\n\n"
    );
}

#[test]
fn test_no_content_option() {
    let dir = TempDir::new().expect("Temp dir");
    let header = dir.path().join("src/shapes.hpp");
    write(&header, SHAPES_HPP);

    let opts = StubOptions {
        show_content: false,
        ..homes(&dir)
    };
    let job = StubJob::new(&header, &opts).expect("Job creation failed");
    generate_stub(&job, &opts).expect("Stub generation failed");

    let stub = fs::read_to_string(dir.path().join("pyx/shapes.pxd")).expect("Stub was written");
    assert!(stub.ends_with("namespace \"geo\":\n  pass\n"));
    assert!(!stub.contains("cppclass"));
}

#[test]
fn test_parse_failure_writes_nothing() {
    let dir = TempDir::new().expect("Temp dir");
    let header = dir.path().join("src/broken.hpp");
    write(&header, "namespace a { int x; }\nnamespace b { int y; }\n");

    let opts = homes(&dir);
    let job = StubJob::new(&header, &opts).expect("Job creation failed");
    let err = generate_stub(&job, &opts).unwrap_err();
    assert!(matches!(err, StubError::Parse { .. }));
    assert!(!job.stub_file.exists());
}

#[test]
fn test_missing_header() {
    let dir = TempDir::new().expect("Temp dir");
    let header = dir.path().join("src/missing.hpp");
    let opts = homes(&dir);
    let job = StubJob::new(&header, &opts).expect("Job creation failed");
    assert!(matches!(generate_stub(&job, &opts).unwrap_err(), StubError::Read { .. }));
}

#[test]
fn test_collect_headers_searches_directories() {
    let dir = TempDir::new().expect("Temp dir");
    let src = dir.path().join("src");
    write(&src.join("a.hpp"), "int a;");
    write(&src.join("nested/b.hpp"), "int b;");
    write(&src.join("nested/b.cpp"), "int b = 1;");
    write(&src.join("notes.txt"), "");
    let extra = dir.path().join("extra.hpp");
    write(&extra, "int c;");

    let headers = collect_headers(&[src.clone(), extra.clone(), src.join("a.hpp")])
        .expect("Collection failed");
    let mut expected: Vec<PathBuf> = vec![src.join("a.hpp"), src.join("nested/b.hpp"), extra];
    expected.sort();
    assert_eq!(headers, expected);
}

#[test]
fn test_run_batch_keeps_order_and_isolates_failures() {
    let dir = TempDir::new().expect("Temp dir");
    let good = dir.path().join("src/good.hpp");
    let bad = dir.path().join("src/bad.hpp");
    let outside = dir.path().join("elsewhere/other.hpp");
    write(&good, "double area(double r);");
    write(&bad, "class Foo { public: int x;");
    write(&outside, "int x;");

    let opts = homes(&dir);
    let results = run_batch(&[good, bad, outside], &opts);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(StubError::Parse { .. })));
    assert!(matches!(results[2], Err(StubError::PathOutsideHome { .. })));
    assert!(dir.path().join("pyx/good.pxd").is_file());
    assert!(!dir.path().join("pyx/bad.pxd").exists());
}
