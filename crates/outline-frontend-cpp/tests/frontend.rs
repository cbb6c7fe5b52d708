//! tree-sitter frontend against on-disk fixtures.

use outline_ast::{DeclKind, ParserFrontend};
use outline_frontend_cpp::{CppFrontend, CppFrontendOptions, FrontendError};
use outline_walker::{outline_file, Walker};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Outline of `main`, with the fixture directory stripped from locations.
fn outline(frontend: &CppFrontend, dir: &Path, main: &Path) -> Vec<String> {
    let prefix = format!("{}/", dir.display());
    outline_file(frontend, main, &Walker::new())
        .unwrap()
        .into_iter()
        .map(|line| line.text.replace(&prefix, ""))
        .collect()
}

const SHAPE_H: &str = r#"#pragma once
#include <memory>

class ShapeBase {
public:
    virtual ~ShapeBase() {}
    virtual int AreaSize() const { return 0; }
    int obj_id_ = 0;
};

inline int twice(int v) { return v * 2; }
"#;

const MAIN_CPP: &str = r#"#include "shape.h"

struct Circle {
    float radius;
    float area() const;
    static int count;
};

float Circle::area() const { return radius * radius * 3.14f; }
int Circle::count = 0;

int twice(int v);

namespace geometry {
    void reset();
    extern int scale;
}
"#;

#[test]
fn test_outline_excludes_header_declarations() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shape.h", SHAPE_H);
    let main = write(dir.path(), "main.cpp", MAIN_CPP);

    let lines = outline(&CppFrontend::new(), dir.path(), &main);
    insta::assert_snapshot!(lines.join("\n"), @r###"
    struct Circle {
    function main.cpp:9:15
    function main.cpp:10:13
    };
    function main.cpp:9:15
    function main.cpp:10:13
    function shape.h:11:12
    namespace geometry {
    function <undefined>
    function <undefined>
    }
    "###);
}

#[test]
fn test_header_declarations_are_spliced_into_the_tree() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shape.h", SHAPE_H);
    let main = write(dir.path(), "main.cpp", MAIN_CPP);

    let tree = CppFrontend::new().parse_file(&main).unwrap();
    let header = tree.root.children.first().unwrap();
    assert_eq!(header.kind, DeclKind::ClassDecl);
    assert_eq!(header.display_name, "ShapeBase");
    assert!(!header.is_in(&tree.main_file));

    let location = header.location.as_ref().unwrap();
    assert!(location.to_string().ends_with("shape.h:4:7"));
}

#[test]
fn test_without_following_includes_header_definitions_are_unknown() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shape.h", SHAPE_H);
    let main = write(dir.path(), "main.cpp", MAIN_CPP);

    let frontend = CppFrontend::with_options(CppFrontendOptions {
        follow_includes: false,
        ..Default::default()
    });
    let tree = frontend.parse_file(&main).unwrap();
    assert!(tree.root.children.iter().all(|child| child.is_in(&tree.main_file)));

    let lines = outline(&frontend, dir.path(), &main);
    assert_eq!(lines[6], "function <undefined>");
}

#[test]
fn test_include_cycles_terminate() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.h", "#include \"b.h\"\nstruct A {};\n");
    write(dir.path(), "b.h", "#include \"a.h\"\nstruct B {};\n");
    let main = write(dir.path(), "main.cpp", "#include \"a.h\"\nstruct Main {};\n");

    let tree = CppFrontend::new().parse_file(&main).unwrap();
    let names: Vec<&str> = tree
        .root
        .children
        .iter()
        .map(|child| child.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "A", "Main"]);

    let lines = outline(&CppFrontend::new(), dir.path(), &main);
    assert_eq!(lines, vec!["struct Main {", "};"]);
}

#[test]
fn test_headers_are_found_in_include_dirs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "include/config.h", "struct Config { int level; };\n");
    let main = write(
        dir.path(),
        "src/main.cpp",
        "#include \"config.h\"\n#include \"missing.h\"\nvoid run();\n",
    );

    let bare = CppFrontend::new().parse_file(&main).unwrap();
    assert_eq!(bare.root.children.len(), 1);

    let frontend = CppFrontend::with_options(CppFrontendOptions {
        include_dirs: vec![dir.path().join("include")],
        ..Default::default()
    });
    let tree = frontend.parse_file(&main).unwrap();
    let kinds: Vec<&DeclKind> = tree.root.children.iter().map(|child| &child.kind).collect();
    assert_eq!(kinds, vec![&DeclKind::StructDecl, &DeclKind::Function]);
}

#[test]
fn test_out_of_line_definitions_in_namespaces() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "registry.cpp",
        r#"namespace reg {
class Registry {
public:
    void add(int id);
    void add(int id, int slot);
};
}

void reg::Registry::add(int id) {}
"#,
    );

    let lines = outline(&CppFrontend::new(), dir.path(), &main);
    assert_eq!(
        lines,
        vec![
            "namespace reg {",
            "class Registry {",
            "function registry.cpp:9:21",
            "function <undefined>",
            "};",
            "}",
            "function registry.cpp:9:21",
        ]
    );
}

#[test]
fn test_strict_syntax_error_surfaces_through_pipeline() {
    let dir = TempDir::new().unwrap();
    let main = write(dir.path(), "broken.cpp", "namespace ns {\nint x = ;\n}\n");

    let frontend = CppFrontend::with_options(CppFrontendOptions {
        strict: true,
        ..Default::default()
    });
    let report = outline_file(&frontend, &main, &Walker::new()).unwrap_err();
    let err = report.downcast_ref::<FrontendError>().unwrap();
    assert!(matches!(err, FrontendError::Syntax { .. }));
}

#[test]
fn test_latin1_sources_are_outlined() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("legacy.h"), b"// d\xe9j\xe0 vu\nvoid legacy() {}\n").unwrap();
    let main = dir.path().join("latin1.cpp");
    fs::write(
        &main,
        b"#include \"legacy.h\"\n// caf\xe9\nstruct Foo { void bar(); };\nvoid legacy();\n",
    )
    .unwrap();

    let lines = outline(&CppFrontend::new(), dir.path(), &main);
    assert_eq!(
        lines,
        vec!["struct Foo {", "function <undefined>", "};", "function legacy.h:2:6"]
    );
}
