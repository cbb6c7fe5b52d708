//! Walk options.

use serde::{Deserialize, Serialize};

/// How deep the originating-file check goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFilter {
    /// Check only the direct children of the root, then render nested
    /// members unconditionally.
    #[default]
    TopLevel,
    /// Check every node; members spelled in another file are skipped with
    /// their subtree.
    EveryLevel,
}

/// Keyword printed in front of variable declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableLabel {
    /// `function <definition>`, the historical label for every leaf
    #[default]
    Function,
    /// `variable <definition>`
    Variable,
}

impl VariableLabel {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableLabel::Function => "function",
            VariableLabel::Variable => "variable",
        }
    }
}

/// Options controlling how a tree is rendered.
///
/// The defaults keep the classic outline format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    pub filter: FileFilter,
    pub variable_label: VariableLabel,
    /// Include the declaration name on function and variable lines
    pub show_names: bool,
}
