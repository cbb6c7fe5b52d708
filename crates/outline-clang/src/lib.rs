//! libclang parser frontend.
//!
//! libclang is loaded at runtime through `clang-sys`, so the workspace builds
//! and the tree-sitter frontend works on machines without it. A missing
//! library surfaces as [`ClangError::Load`] when a parse is attempted.

mod error;
mod parse;

pub use error::ClangError;
pub use parse::ClangParser;

use outline_ast::{DeclTree, ParserFrontend};
use std::path::Path;

/// Parser frontend backed by libclang.
#[derive(Debug, Clone, Default)]
pub struct ClangFrontend {
    args: Vec<String>,
    strict: bool,
}

impl ClangFrontend {
    /// A frontend passing `args` to clang (`-x c++ -std=... -I... -D...`).
    pub fn new(args: Vec<String>) -> Self {
        Self { args, strict: false }
    }

    /// Fail the parse on the first error diagnostic.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl ParserFrontend for ClangFrontend {
    type Error = ClangError;

    fn name(&self) -> &'static str {
        "clang"
    }

    fn parse_file(&self, path: &Path) -> Result<DeclTree, ClangError> {
        let parser = ClangParser::new()?;
        parser.parse_file(path, &self.args, self.strict)
    }
}
