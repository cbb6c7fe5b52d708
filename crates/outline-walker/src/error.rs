//! Error types for outline-walker.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the walker itself.
///
/// File mismatches and unknown kinds are never errors; they only suppress
/// output.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    /// The root handed to the walker is not a translation unit.
    #[error("Invalid declaration tree: root node is {found}, expected a translation unit")]
    #[diagnostic(
        code(outline::walk::invalid_tree),
        help("pass the root node produced by a parser frontend")
    )]
    InvalidTree { found: String },
}
