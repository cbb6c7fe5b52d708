//! The parser frontend seam.

use crate::node::DeclTree;
use std::path::Path;

/// Something that turns a C++ source file into a declaration tree.
///
/// Frontends are constructed by the caller and handed to the pipeline; no
/// frontend keeps global state.
pub trait ParserFrontend {
    type Error: miette::Diagnostic + Send + Sync + 'static;

    /// Short name used in logs (`"tree-sitter"`, `"clang"`).
    fn name(&self) -> &'static str;

    /// Parse `path` into an owned declaration tree.
    fn parse_file(&self, path: &Path) -> Result<DeclTree, Self::Error>;
}
