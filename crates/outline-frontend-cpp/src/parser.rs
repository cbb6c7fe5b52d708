use crate::error::FrontendError;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parse C++ source code into a tree-sitter Tree.
pub fn parse(source: &str, path: &Path) -> Result<Tree, FrontendError> {
    let mut parser = Parser::new();
    let language = tree_sitter_cpp::LANGUAGE;
    parser.set_language(&language.into())?;

    parser
        .parse(source, None)
        .ok_or_else(|| FrontendError::Parse(path.to_path_buf()))
}

/// All `ERROR` and `MISSING` nodes below `node`, in source order.
pub fn error_nodes(node: Node) -> Vec<Node> {
    let mut errors = Vec::new();
    collect_errors(node, &mut errors);
    errors
}

fn collect_errors<'t>(node: Node<'t>, errors: &mut Vec<Node<'t>>) {
    if node.is_error() || node.is_missing() {
        errors.push(node);
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, errors);
    }
}
