//! Error types for the tree-sitter frontend.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a C++ file into a declaration tree.
#[derive(Error, Diagnostic, Debug)]
pub enum FrontendError {
    /// The main source file could not be read.
    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(outline::frontend::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiled grammar does not match the tree-sitter runtime.
    #[error("Failed to load the C++ grammar")]
    #[diagnostic(code(outline::frontend::language))]
    Language(#[from] tree_sitter::LanguageError),

    /// tree-sitter gave up without producing a tree.
    #[error("Failed to parse {}", .0.display())]
    #[diagnostic(code(outline::frontend::parse))]
    Parse(PathBuf),

    /// The source has syntax errors and strict mode is on.
    #[error("Syntax error in {file} at {line}:{column} ({count} error node(s))")]
    #[diagnostic(
        code(outline::frontend::syntax),
        help("fix the source or run without --strict to outline what could be recovered")
    )]
    Syntax {
        file: String,
        line: u32,
        column: u32,
        count: usize,
    },
}
