//! Declaration walker for the cpp-outline tool.
//!
//! This crate provides:
//! - [`Walker`]: renders a declaration tree into brace-matched outline lines
//! - [`WalkOptions`]: the file-filter depth and labelling knobs
//! - [`LineSink`]: destinations for rendered lines
//! - [`outline_file`]: frontend → walker pipeline for a single file
//!
//! # Example
//!
//! ```
//! use outline_ast::{DeclKind, DeclNode, FileIdentity, SourceLocation};
//! use outline_walker::Walker;
//!
//! let file = FileIdentity::new("test.cpp");
//! let root = DeclNode::translation_unit(&file).with_child(
//!     DeclNode::new(DeclKind::StructDecl, "Foo")
//!         .at(SourceLocation::new("test.cpp", 1, 8))
//!         .with_child(DeclNode::new(DeclKind::Method, "bar")),
//! );
//!
//! let lines = Walker::new().render(&root, &file).unwrap();
//! let text: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
//! assert_eq!(text, ["struct Foo {", "function <undefined>", "};"]);
//! ```

mod error;
mod options;
mod outline;
mod sink;
mod walker;

pub use error::WalkError;
pub use options::{FileFilter, VariableLabel, WalkOptions};
pub use outline::{OutlineLine, ABSENT_DEFINITION};
pub use sink::{LineSink, WriterSink};
pub use walker::Walker;

use miette::Result;
use outline_ast::ParserFrontend;
use std::path::Path;
use tracing::{debug, info};

/// Parse `path` with `frontend` and render its outline.
///
/// Frontend errors are returned unchanged inside the report, so callers can
/// `downcast_ref` to the frontend's error type. Nothing is rendered unless
/// the parse succeeds.
pub fn outline_file<F: ParserFrontend>(
    frontend: &F,
    path: &Path,
    walker: &Walker,
) -> Result<Vec<OutlineLine>> {
    debug!(frontend = frontend.name(), path = %path.display(), "parsing");
    let tree = frontend.parse_file(path)?;
    info!("Translation unit: {}", tree.main_file);

    let lines = walker.render(&tree.root, &tree.main_file)?;
    debug!(lines = lines.len(), nodes = tree.root.count(), "rendered outline");
    Ok(lines)
}
