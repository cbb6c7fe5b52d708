//! Declaration tree model for the cpp-outline tool.
//!
//! Parser frontends (tree-sitter, libclang) convert their native trees into
//! owned [`DeclNode`]s; the walker only ever sees this representation.
//!
//! # Architecture
//!
//! ```text
//! C++ Source → ParserFrontend → DeclTree → Walker → OutlineLine*
//! ```

mod frontend;
mod location;
mod node;

pub use frontend::ParserFrontend;
pub use location::{FileIdentity, SourceLocation};
pub use node::{DeclKind, DeclNode, DeclTree};
