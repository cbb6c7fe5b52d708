//! Declaration tree nodes.

use crate::location::{FileIdentity, SourceLocation};
use smol_str::SmolStr;
use std::fmt;

/// A parsed translation unit.
#[derive(Debug, Clone)]
pub struct DeclTree {
    /// Root node, always of kind [`DeclKind::TranslationUnit`] when produced by a frontend
    pub root: DeclNode,
    /// The file the translation unit was parsed from
    pub main_file: FileIdentity,
}

/// A node in the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclNode {
    /// Kind of this node
    pub kind: DeclKind,
    /// Display label (empty for anonymous declarations)
    pub display_name: SmolStr,
    /// Where the declaration is spelled, if the frontend knows
    pub location: Option<SourceLocation>,
    /// Location of the defining declaration, `None` for a pure declaration
    pub definition: Option<SourceLocation>,
    /// Child nodes in declaration order
    pub children: Vec<DeclNode>,
}

/// Declaration categories the outline distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Translation unit (root)
    TranslationUnit,
    Namespace,
    StructDecl,
    ClassDecl,
    /// Member function, including out-of-line definitions
    Method,
    /// Free function
    Function,
    VariableDecl,
    /// Anything else, labelled with the frontend's own spelling
    Other(SmolStr),
}

impl DeclKind {
    pub fn other(spelling: impl Into<SmolStr>) -> Self {
        DeclKind::Other(spelling.into())
    }

    /// Name used in logs.
    pub fn spelling(&self) -> &str {
        match self {
            DeclKind::TranslationUnit => "TranslationUnit",
            DeclKind::Namespace => "Namespace",
            DeclKind::StructDecl => "StructDecl",
            DeclKind::ClassDecl => "ClassDecl",
            DeclKind::Method => "Method",
            DeclKind::Function => "Function",
            DeclKind::VariableDecl => "VariableDecl",
            DeclKind::Other(spelling) => spelling,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

impl DeclNode {
    pub fn new(kind: DeclKind, display_name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            location: None,
            definition: None,
            children: Vec::new(),
        }
    }

    /// An empty translation unit root.
    pub fn translation_unit(file: &FileIdentity) -> Self {
        Self::new(DeclKind::TranslationUnit, file.to_string())
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn defined_at(mut self, definition: SourceLocation) -> Self {
        self.definition = Some(definition);
        self
    }

    /// Mark this node as its own definition.
    pub fn self_defined(mut self) -> Self {
        self.definition = self.location.clone();
        self
    }

    pub fn with_child(mut self, child: DeclNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DeclNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether the node was spelled in `target`. Nodes without a location never match.
    pub fn is_in(&self, target: &FileIdentity) -> bool {
        self.location
            .as_ref()
            .is_some_and(|location| location.is_in(target))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DeclNode::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let file = FileIdentity::new("test.cpp");
        let node = DeclNode::new(DeclKind::Function, "bar")
            .at(SourceLocation::new("test.cpp", 3, 6))
            .self_defined();

        assert!(node.is_in(&file));
        assert_eq!(node.definition, node.location);
        assert_eq!(node.count(), 1);
    }

    #[test]
    fn test_node_without_location_is_nowhere() {
        let node = DeclNode::new(DeclKind::StructDecl, "Foo");
        assert!(!node.is_in(&FileIdentity::new("test.cpp")));
    }

    #[test]
    fn test_other_kind_spelling() {
        assert_eq!(DeclKind::other("FieldDecl").spelling(), "FieldDecl");
        assert_eq!(DeclKind::Namespace.to_string(), "Namespace");
    }
}
