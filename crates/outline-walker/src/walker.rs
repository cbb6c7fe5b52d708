//! The declaration walker.

use crate::error::WalkError;
use crate::options::{FileFilter, WalkOptions};
use crate::outline::{OutlineLine, ABSENT_DEFINITION};
use outline_ast::{DeclKind, DeclNode, FileIdentity};
use tracing::trace;

/// Renders a declaration tree into outline lines.
///
/// The walker is stateless between calls: it borrows the tree for the
/// duration of [`Walker::render`] and keeps nothing afterwards.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    options: WalkOptions,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WalkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Render the declarations of `root` that were spelled in `target`.
    ///
    /// Only the direct children of `root` are checked against `target`
    /// (unless [`FileFilter::EveryLevel`] is set); a child from another file
    /// is skipped along with everything below it.
    pub fn render(
        &self,
        root: &DeclNode,
        target: &FileIdentity,
    ) -> Result<Vec<OutlineLine>, WalkError> {
        if root.kind != DeclKind::TranslationUnit {
            return Err(WalkError::InvalidTree {
                found: root.kind.to_string(),
            });
        }

        let mut lines = Vec::new();
        for child in &root.children {
            if child.is_in(target) {
                self.dispatch(child, target, 0, &mut lines);
            } else {
                trace!(kind = %child.kind, name = %child.display_name, "skipping declaration from another file");
            }
        }
        Ok(lines)
    }

    fn dispatch(
        &self,
        node: &DeclNode,
        target: &FileIdentity,
        depth: usize,
        lines: &mut Vec<OutlineLine>,
    ) {
        match &node.kind {
            DeclKind::Namespace => self.render_scope(node, "namespace", "}", target, depth, lines),
            DeclKind::StructDecl => self.render_scope(node, "struct", "};", target, depth, lines),
            DeclKind::ClassDecl => self.render_scope(node, "class", "};", target, depth, lines),
            DeclKind::Method | DeclKind::Function => {
                lines.push(self.render_leaf(node, "function", depth));
            }
            DeclKind::VariableDecl => {
                let keyword = self.options.variable_label.keyword();
                lines.push(self.render_leaf(node, keyword, depth));
            }
            DeclKind::TranslationUnit | DeclKind::Other(_) => {
                trace!(kind = %node.kind, "not rendered");
            }
        }
    }

    /// Opener, every child through the body renderer, closer.
    fn render_scope(
        &self,
        node: &DeclNode,
        keyword: &str,
        closer: &str,
        target: &FileIdentity,
        depth: usize,
        lines: &mut Vec<OutlineLine>,
    ) {
        lines.push(OutlineLine::new(
            depth,
            format!("{} {} {{", keyword, node.display_name),
        ));
        self.render_body(node, target, depth + 1, lines);
        lines.push(OutlineLine::new(depth, closer));
    }

    fn render_body(
        &self,
        node: &DeclNode,
        target: &FileIdentity,
        depth: usize,
        lines: &mut Vec<OutlineLine>,
    ) {
        for child in &node.children {
            if self.options.filter == FileFilter::EveryLevel && !child.is_in(target) {
                trace!(kind = %child.kind, name = %child.display_name, "skipping nested declaration from another file");
                continue;
            }
            self.dispatch(child, target, depth, lines);
        }
    }

    fn render_leaf(&self, node: &DeclNode, keyword: &str, depth: usize) -> OutlineLine {
        let definition = match &node.definition {
            Some(location) => location.to_string(),
            None => ABSENT_DEFINITION.to_string(),
        };

        let text = if self.options.show_names {
            format!("{} {} {}", keyword, node.display_name, definition)
        } else {
            format!("{} {}", keyword, definition)
        };
        OutlineLine::new(depth, text)
    }
}
