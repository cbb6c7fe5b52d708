//! Definition index over a translation unit.
//!
//! A pre-pass records every record name and every function/variable
//! definition by qualified key, so that pure declarations can point at the
//! declaration that defines them, wherever it appears in the unit.

use crate::source::{SourceSet, SourceUnit};
use crate::syntax::{
    arity, conditional_contents, declarator_name, declarators, function_declarator,
    function_key, has_storage_class, is_record_specifier, namespace_segments, split_qualified,
    Scope, CONDITIONAL_BLOCKS,
};
use outline_ast::SourceLocation;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use tree_sitter::Node;

#[derive(Debug, Default)]
pub(crate) struct DefinitionIndex {
    records: FxHashSet<String>,
    definitions: FxHashMap<String, SourceLocation>,
}

impl DefinitionIndex {
    pub fn build(sources: &SourceSet) -> Self {
        let mut builder = IndexBuilder {
            sources,
            index: DefinitionIndex::default(),
            visited: FxHashSet::default(),
        };
        if let Some(main) = sources.main() {
            builder.visited.insert(main.path.clone());
            builder.index_items(main, main.tree.root_node(), &Scope::default());
        }
        builder.index
    }

    /// The first definition recorded under `key`.
    pub fn lookup(&self, key: &str) -> Option<SourceLocation> {
        self.definitions.get(key).cloned()
    }

    pub fn is_record(&self, qualified: &str) -> bool {
        self.records.contains(qualified)
    }

    fn define(&mut self, key: String, location: SourceLocation) {
        self.definitions.entry(key).or_insert(location);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }
}

struct IndexBuilder<'a> {
    sources: &'a SourceSet,
    index: DefinitionIndex,
    visited: FxHashSet<PathBuf>,
}

impl<'a> IndexBuilder<'a> {
    fn index_items(&mut self, unit: &'a SourceUnit, parent: Node<'a>, scope: &Scope) {
        let mut cursor = parent.walk();
        let children: Vec<Node<'a>> = parent.named_children(&mut cursor).collect();
        for child in children {
            self.index_item(unit, child, scope);
        }
    }

    fn index_item(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) {
        let src = unit.content.as_bytes();

        match node.kind() {
            "namespace_definition" => {
                let names: Vec<String> = node
                    .child_by_field_name("name")
                    .map(namespace_segments)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|segment| unit.text(segment).to_string())
                    .collect();
                if let Some(body) = node.child_by_field_name("body") {
                    self.index_items(unit, body, &scope.enter_namespace(&names));
                }
            }
            kind if is_record_specifier(node) && kind != "union_specifier" => {
                self.index_record(unit, node, scope);
            }
            "function_definition" => {
                if let Some(fd) = node
                    .child_by_field_name("declarator")
                    .and_then(function_declarator)
                {
                    if let Some(name) = declarator_name(fd) {
                        let (qualifier, name) = split_qualified(name, src);
                        let qualified = scope.qualify(&qualifier, unit.text(name));
                        self.index
                            .define(function_key(&qualified, arity(fd, src)), unit.location(name));
                    }
                }
            }
            "declaration" | "field_declaration" | "type_definition" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    if is_record_specifier(ty) {
                        self.index_record(unit, ty, scope);
                    }
                }
                if node.kind() != "type_definition" {
                    self.index_variables(unit, node, scope);
                }
            }
            "preproc_include" => self.index_include(unit, node, scope),
            kind if CONDITIONAL_BLOCKS.contains(&kind) => {
                for child in conditional_contents(node) {
                    self.index_item(unit, child, scope);
                }
            }
            _ => {}
        }
    }

    fn index_record(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) {
        let src = unit.content.as_bytes();
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let (qualifier, name) = split_qualified(name, src);
        let name = unit.text(name);
        self.index.records.insert(scope.qualify(&qualifier, name));

        if let Some(body) = node.child_by_field_name("body") {
            self.index_items(unit, body, &scope.enter_record(&qualifier, name));
        }
    }

    /// Record variables that define storage: not `extern` without an
    /// initializer, and not an in-class `static` member without one.
    fn index_variables(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) {
        let src = unit.content.as_bytes();
        let in_record = node.kind() == "field_declaration";
        let is_extern = has_storage_class(node, "extern", src);
        let is_static = has_storage_class(node, "static", src);

        for declarator in declarators(node) {
            if function_declarator(declarator).is_some() {
                continue;
            }
            let initialized =
                declarator.kind() == "init_declarator" || node.child_by_field_name("default_value").is_some();
            let defines = if in_record {
                is_static && initialized
            } else {
                !is_extern || initialized
            };
            if !defines {
                continue;
            }
            if let Some(name) = declarator_name(declarator) {
                let (qualifier, name) = split_qualified(name, src);
                let qualified = scope.qualify(&qualifier, unit.text(name));
                self.index.define(qualified, unit.location(name));
            }
        }
    }

    fn index_include(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) {
        let sources = self.sources;
        let Some(header) = include_target(unit, node).and_then(|path| sources.get(&path)) else {
            return;
        };
        if self.visited.insert(header.path.clone()) {
            self.index_items(header, header.tree.root_node(), scope);
        }
    }
}

/// Resolved path of a quoted include directive, if it was resolved at load time.
pub(crate) fn include_target(unit: &SourceUnit, node: Node) -> Option<PathBuf> {
    let path = node.child_by_field_name("path")?;
    if path.kind() != "string_literal" {
        return None;
    }
    let spelled = unit.text(path).trim_matches('"');
    unit.includes.get(spelled).cloned()
}
