//! Lower tree-sitter-cpp syntax trees into declaration nodes.
//!
//! Kinds follow libclang's cursor classification: constructors,
//! destructors, conversion operators, templates, fields and enums are not
//! functions, structs or variables and come out as [`DeclKind::Other`].

use crate::index::{include_target, DefinitionIndex};
use crate::source::{SourceSet, SourceUnit};
use crate::syntax::{
    arity, conditional_contents, declarator_name, declarators, function_declarator,
    function_key, has_storage_class, is_record_specifier, namespace_segments, split_qualified,
    Scope, CONDITIONAL_BLOCKS,
};
use outline_ast::{DeclKind, DeclNode, SourceLocation};
use rustc_hash::FxHashSet;
use std::path::PathBuf;
use tracing::{debug, trace};
use tree_sitter::Node;

/// Lower the main file of `sources` (with spliced headers) into root children.
pub(crate) fn lower(sources: &SourceSet, index: &DefinitionIndex, follow_includes: bool) -> Vec<DeclNode> {
    let mut ctx = LoweringContext {
        sources,
        index,
        follow_includes,
        spliced: FxHashSet::default(),
    };

    let mut children = Vec::new();
    if let Some(main) = sources.main() {
        ctx.spliced.insert(main.path.clone());
        ctx.lower_items(main, main.tree.root_node(), &Scope::default(), &mut children);
    }
    children
}

struct LoweringContext<'a> {
    sources: &'a SourceSet,
    index: &'a DefinitionIndex,
    follow_includes: bool,
    /// Files already spliced into this unit; each is expanded once
    spliced: FxHashSet<PathBuf>,
}

impl<'a> LoweringContext<'a> {
    fn lower_items(
        &mut self,
        unit: &'a SourceUnit,
        parent: Node<'a>,
        scope: &Scope,
        out: &mut Vec<DeclNode>,
    ) {
        let mut cursor = parent.walk();
        let children: Vec<Node<'a>> = parent.named_children(&mut cursor).collect();
        for child in children {
            self.lower_item(unit, child, scope, out);
        }
    }

    fn lower_item(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope, out: &mut Vec<DeclNode>) {
        match node.kind() {
            "namespace_definition" => out.push(self.lower_namespace(unit, node, scope)),
            _ if is_record_specifier(node) => out.push(self.lower_record(unit, node, scope)),
            "function_definition" => out.push(self.lower_function_definition(unit, node, scope)),
            "declaration" | "field_declaration" => self.lower_declaration(unit, node, scope, out),
            "type_definition" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    if is_record_specifier(ty) && ty.child_by_field_name("body").is_some() {
                        out.push(self.lower_record(unit, ty, scope));
                    }
                }
                out.push(other(unit, node));
            }
            "preproc_include" => self.splice_include(unit, node, scope, out),
            kind if CONDITIONAL_BLOCKS.contains(&kind) => {
                for child in conditional_contents(node) {
                    self.lower_item(unit, child, scope, out);
                }
            }
            "comment" | "access_specifier" | "preproc_def" | "preproc_function_def"
            | "preproc_call" => {}
            _ => out.push(other(unit, node)),
        }
    }

    fn lower_namespace(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) -> DeclNode {
        let mut segments: Vec<(String, SourceLocation)> = node
            .child_by_field_name("name")
            .map(namespace_segments)
            .unwrap_or_default()
            .into_iter()
            .map(|segment| (unit.text(segment).to_string(), unit.location(segment)))
            .collect();
        if segments.is_empty() {
            // Anonymous namespace
            segments.push((String::new(), unit.location(node)));
        }

        let names: Vec<String> = segments.iter().map(|(name, _)| name.clone()).collect();
        let mut children = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.lower_items(unit, body, &scope.enter_namespace(&names), &mut children);
        }

        // `namespace a::b { ... }` nests b inside a
        let mut nested: Option<DeclNode> = None;
        for (name, location) in segments.into_iter().rev() {
            let inner = match nested.take() {
                Some(inner) => vec![inner],
                None => std::mem::take(&mut children),
            };
            nested = Some(
                DeclNode::new(DeclKind::Namespace, name)
                    .at(location)
                    .with_children(inner),
            );
        }
        nested.unwrap_or_else(|| other(unit, node))
    }

    fn lower_record(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) -> DeclNode {
        let kind = match node.kind() {
            "struct_specifier" => DeclKind::StructDecl,
            "class_specifier" => DeclKind::ClassDecl,
            kind => DeclKind::other(kind),
        };

        let (qualifier, name, location) = match node.child_by_field_name("name") {
            Some(name) => {
                let (qualifier, name) = split_qualified(name, unit.content.as_bytes());
                (qualifier, unit.text(name).to_string(), unit.location(name))
            }
            None => (Vec::new(), String::new(), unit.location(node)),
        };

        let mut record = DeclNode::new(kind, name.as_str()).at(location);
        if let Some(body) = node.child_by_field_name("body") {
            record = record.self_defined();
            // Unions are not rendered; their members do not matter
            if record.kind != DeclKind::other("union_specifier") {
                let inner = scope.enter_record(&qualifier, &name);
                self.lower_items(unit, body, &inner, &mut record.children);
            }
        }
        record
    }

    fn lower_function_definition(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope) -> DeclNode {
        match node
            .child_by_field_name("declarator")
            .and_then(function_declarator)
        {
            Some(fd) => self.lower_callable(unit, fd, scope, true),
            None => other(unit, node),
        }
    }

    /// `declaration` (namespace scope or constructors in a class) and
    /// `field_declaration` (class members).
    fn lower_declaration(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope, out: &mut Vec<DeclNode>) {
        let src = unit.content.as_bytes();

        let declarators = declarators(node);

        // `struct Foo { ... } foo;` declares the record and the variable
        if let Some(ty) = node.child_by_field_name("type") {
            if is_record_specifier(ty)
                && (ty.child_by_field_name("body").is_some() || declarators.is_empty())
            {
                out.push(self.lower_record(unit, ty, scope));
            }
        }

        let in_record = node.kind() == "field_declaration";
        let is_extern = has_storage_class(node, "extern", src);
        let is_static = has_storage_class(node, "static", src);

        for declarator in declarators {
            if let Some(fd) = function_declarator(declarator) {
                out.push(self.lower_callable(unit, fd, scope, false));
                continue;
            }

            if in_record && !is_static {
                out.push(
                    DeclNode::new(DeclKind::other("field_declaration"), field_name(unit, declarator))
                        .at(unit.location(declarator)),
                );
                continue;
            }

            let initialized = declarator.kind() == "init_declarator"
                || node.child_by_field_name("default_value").is_some();
            let defines = if in_record {
                initialized
            } else {
                !is_extern || initialized
            };
            out.push(self.lower_variable(unit, declarator, scope, defines));
        }
    }

    fn lower_callable(&mut self, unit: &'a SourceUnit, fd: Node<'a>, scope: &Scope, defines: bool) -> DeclNode {
        let src = unit.content.as_bytes();
        let Some(name) = declarator_name(fd) else {
            return other(unit, fd);
        };
        let (qualifier, name) = split_qualified(name, src);
        let spelled = unit.text(name);
        let location = unit.location(name);

        let is_constructor = (qualifier.is_empty() && scope.record.as_deref() == Some(spelled))
            || qualifier.last().map(String::as_str) == Some(spelled);
        let kind = match name.kind() {
            "destructor_name" => DeclKind::other("destructor"),
            "operator_cast" => DeclKind::other("conversion_function"),
            _ if is_constructor => DeclKind::other("constructor"),
            _ if scope.record.is_some() => DeclKind::Method,
            // `void Foo::bar() {}` is a method when Foo is a known record
            _ if !qualifier.is_empty() && self.index.is_record(&scope.qualify(&qualifier, "")) => {
                DeclKind::Method
            }
            _ => DeclKind::Function,
        };

        let key = function_key(&scope.qualify(&qualifier, spelled), arity(fd, src));
        let definition = if defines {
            Some(location.clone())
        } else {
            self.index.lookup(&key)
        };
        trace!(%kind, %key, defined = definition.is_some(), "callable");

        let mut node = DeclNode::new(kind, spelled).at(location);
        node.definition = definition;
        node
    }

    fn lower_variable(&mut self, unit: &'a SourceUnit, declarator: Node<'a>, scope: &Scope, defines: bool) -> DeclNode {
        let Some(name) = declarator_name(declarator) else {
            return other(unit, declarator);
        };
        let (qualifier, name) = split_qualified(name, unit.content.as_bytes());
        let spelled = unit.text(name);
        let location = unit.location(name);

        let definition = if defines {
            Some(location.clone())
        } else {
            self.index.lookup(&scope.qualify(&qualifier, spelled))
        };

        let mut node = DeclNode::new(DeclKind::VariableDecl, spelled).at(location);
        node.definition = definition;
        node
    }

    /// Splice a quoted header's declarations in place of its include.
    fn splice_include(&mut self, unit: &'a SourceUnit, node: Node<'a>, scope: &Scope, out: &mut Vec<DeclNode>) {
        if !self.follow_includes {
            return;
        }
        let sources = self.sources;
        let Some(header) = include_target(unit, node).and_then(|path| sources.get(&path)) else {
            return;
        };
        if !self.spliced.insert(header.path.clone()) {
            trace!(header = %header.path.display(), "already spliced");
            return;
        }

        debug!(header = %header.path.display(), into = %unit.path.display(), "splicing include");
        self.lower_items(header, header.tree.root_node(), scope, out);
    }
}

/// A node the outline does not render, labelled with its grammar kind.
fn other(unit: &SourceUnit, node: Node) -> DeclNode {
    DeclNode::new(DeclKind::other(node.kind()), "").at(unit.location(node))
}

fn field_name(unit: &SourceUnit, declarator: Node) -> String {
    declarator_name(declarator)
        .map(|name| unit.text(name).to_string())
        .unwrap_or_default()
}
