//! Parsed source files making up one translation unit.

use outline_ast::{FileIdentity, SourceLocation};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;
use tree_sitter::{Node, Tree};

/// Read a source file, replacing bytes that are not UTF-8.
///
/// Legacy encodings in comments and string literals do not affect the
/// declaration structure, so the file is still outlined.
pub(crate) fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8_lossy(&bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warn!(file = %path.display(), "source is not valid UTF-8, invalid bytes replaced");
            text
        }
    })
}

/// One parsed file (the main file or a spliced header).
pub(crate) struct SourceUnit {
    pub path: PathBuf,
    pub file: FileIdentity,
    pub content: String,
    pub tree: Tree,
    /// Quoted include spelling → resolved header path
    pub includes: FxHashMap<String, PathBuf>,
}

impl SourceUnit {
    pub fn text(&self, node: Node) -> &str {
        node.utf8_text(self.content.as_bytes()).unwrap_or("")
    }

    /// 1-based location of `node` in this file.
    pub fn location(&self, node: Node) -> SourceLocation {
        let start = node.start_position();
        SourceLocation::new(self.file.clone(), start.row as u32 + 1, start.column as u32 + 1)
    }
}

/// The main file plus every header reachable through quoted includes.
pub(crate) struct SourceSet {
    main: PathBuf,
    units: FxHashMap<PathBuf, SourceUnit>,
}

impl SourceSet {
    pub fn new(main: SourceUnit) -> Self {
        let path = main.path.clone();
        let mut units = FxHashMap::default();
        units.insert(path.clone(), main);
        Self { main: path, units }
    }

    pub fn main(&self) -> Option<&SourceUnit> {
        self.units.get(&self.main)
    }

    pub fn get(&self, path: &Path) -> Option<&SourceUnit> {
        self.units.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.units.contains_key(path)
    }

    pub fn insert(&mut self, unit: SourceUnit) {
        self.units.insert(unit.path.clone(), unit);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }
}

/// Every `#include "..."` spelling in `node`, in source order.
pub(crate) fn quoted_includes(node: Node, content: &str) -> Vec<String> {
    let mut includes = Vec::new();
    collect_includes(node, content.as_bytes(), &mut includes);
    includes
}

fn collect_includes(node: Node, content: &[u8], includes: &mut Vec<String>) {
    if node.kind() == "preproc_include" {
        if let Some(path) = node.child_by_field_name("path") {
            if path.kind() == "string_literal" {
                let spelled = path.utf8_text(content).unwrap_or("").trim_matches('"');
                if !spelled.is_empty() {
                    includes.push(spelled.to_string());
                }
            }
        }
        return;
    }

    // Includes inside function bodies are not declarations of this unit
    if node.kind() == "compound_statement" {
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_includes(child, content, includes);
    }
}
