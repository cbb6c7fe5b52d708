//! tree-sitter based C++ parser frontend.
//!
//! Produces a [`DeclTree`] for one translation unit without a system
//! compiler: the main file and every header reachable through quoted
//! includes are parsed with tree-sitter-cpp, a definition index is built
//! over all of them, and the main file is lowered with each header spliced
//! in place of its first `#include`.
//!
//! ```text
//! main.cpp ──► load (follow "x.h") ──► SourceSet
//!                                         │
//!                         DefinitionIndex ◄┤
//!                                         ▼
//!                                  lower ──► DeclTree
//! ```

mod error;
mod index;
mod lower;
mod parser;
mod source;
mod syntax;

pub use error::FrontendError;
pub use parser::parse;

use index::DefinitionIndex;
use outline_ast::{DeclNode, DeclTree, FileIdentity, ParserFrontend};
use rustc_hash::FxHashMap;
use source::{quoted_includes, read_source, SourceSet, SourceUnit};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options for [`CppFrontend`].
#[derive(Debug, Clone)]
pub struct CppFrontendOptions {
    /// Directories searched for quoted includes after the including file's directory
    pub include_dirs: Vec<PathBuf>,
    /// Parse and splice quoted includes
    pub follow_includes: bool,
    /// Fail on syntax errors instead of outlining the recovered tree
    pub strict: bool,
}

impl Default for CppFrontendOptions {
    fn default() -> Self {
        Self {
            include_dirs: Vec::new(),
            follow_includes: true,
            strict: false,
        }
    }
}

/// Parser frontend backed by tree-sitter-cpp.
#[derive(Debug, Clone, Default)]
pub struct CppFrontend {
    options: CppFrontendOptions,
}

impl CppFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CppFrontendOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CppFrontendOptions {
        &self.options
    }

    /// Parse in-memory source as if it were the file `filename`.
    ///
    /// Quoted includes are resolved relative to `filename`'s directory.
    pub fn parse_source(&self, source: &str, filename: &str) -> Result<DeclTree, FrontendError> {
        let path = PathBuf::from(filename);
        let main = self.parse_unit(&path, source.to_string())?;
        self.build_tree(main)
    }

    fn build_tree(&self, main: SourceUnit) -> Result<DeclTree, FrontendError> {
        let main_file = main.file.clone();
        let sources = self.load(main)?;
        let index = DefinitionIndex::build(&sources);
        debug!(
            file = %main_file,
            files = sources.len(),
            definitions = index.len(),
            "indexed translation unit"
        );

        let children = lower::lower(&sources, &index, self.options.follow_includes);
        Ok(DeclTree {
            root: DeclNode::translation_unit(&main_file).with_children(children),
            main_file,
        })
    }

    /// Parse every header reachable from `main` through quoted includes.
    fn load(&self, main: SourceUnit) -> Result<SourceSet, FrontendError> {
        let mut queue: VecDeque<PathBuf> = main.includes.values().cloned().collect();
        let mut sources = SourceSet::new(main);

        while let Some(path) = queue.pop_front() {
            if sources.contains(&path) {
                continue;
            }
            let content = match read_source(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(header = %path.display(), "skipping unreadable header: {}", err);
                    continue;
                }
            };

            let unit = self.parse_unit(&path, content)?;
            queue.extend(unit.includes.values().cloned());
            sources.insert(unit);
        }

        Ok(sources)
    }

    fn parse_unit(&self, path: &Path, content: String) -> Result<SourceUnit, FrontendError> {
        debug!(file = %path.display(), "parsing");
        let tree = parse(&content, path)?;
        let file = FileIdentity::new(path);

        let errors = parser::error_nodes(tree.root_node());
        if let Some(first) = errors.first() {
            let start = first.start_position();
            let (line, column) = (start.row as u32 + 1, start.column as u32 + 1);
            if self.options.strict {
                return Err(FrontendError::Syntax {
                    file: file.to_string(),
                    line,
                    column,
                    count: errors.len(),
                });
            }
            warn!(
                file = %file,
                count = errors.len(),
                "syntax errors at {}:{}, outlining the recovered tree",
                line,
                column
            );
        }

        let mut includes = FxHashMap::default();
        if self.options.follow_includes {
            for spelled in quoted_includes(tree.root_node(), &content) {
                match self.resolve_include(path, &spelled) {
                    Some(resolved) => {
                        includes.insert(spelled, resolved);
                    }
                    None => warn!(file = %file, include = %spelled, "include not found"),
                }
            }
        }

        Ok(SourceUnit {
            path: path.to_path_buf(),
            file,
            content,
            tree,
            includes,
        })
    }

    /// Look for `spelled` next to `from`, then in each include directory.
    fn resolve_include(&self, from: &Path, spelled: &str) -> Option<PathBuf> {
        let local = from.parent().map(|dir| dir.join(spelled));
        local
            .into_iter()
            .chain(self.options.include_dirs.iter().map(|dir| dir.join(spelled)))
            .find(|candidate| candidate.is_file())
            .map(|found| normalize(&found))
    }
}

impl ParserFrontend for CppFrontend {
    type Error = FrontendError;

    fn name(&self) -> &'static str {
        "tree-sitter"
    }

    fn parse_file(&self, path: &Path) -> Result<DeclTree, FrontendError> {
        let content = read_source(path).map_err(|source| FrontendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let main = self.parse_unit(path, content)?;
        self.build_tree(main)
    }
}

/// Lexically drop `.` and fold `dir/..`, so one header reached through
/// different spellings is loaded once.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.components().next_back(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use outline_ast::DeclKind;

    fn kinds(node: &DeclNode) -> Vec<String> {
        node.children.iter().map(|c| c.kind.to_string()).collect()
    }

    #[test]
    fn test_normalize_folds_parent_dirs() {
        assert_eq!(normalize(Path::new("src/./a/../b.h")), PathBuf::from("src/b.h"));
        assert_eq!(normalize(Path::new("../x.h")), PathBuf::from("../x.h"));
    }

    #[test]
    fn test_parse_source_classifies_declarations() {
        let source = r#"
namespace ns {
    int counter = 0;
    void helper();
}
struct Point {
    Point();
    ~Point();
    int x;
    static int instances;
    int length() const;
};
class Widget;
int Point::length() const { return x; }
"#;
        let tree = CppFrontend::new().parse_source(source, "sample.cpp").unwrap();
        assert_eq!(tree.root.kind, DeclKind::TranslationUnit);
        assert_eq!(
            kinds(&tree.root),
            vec!["Namespace", "StructDecl", "ClassDecl", "Method"]
        );

        let ns = &tree.root.children[0];
        assert_eq!(kinds(ns), vec!["VariableDecl", "Function"]);
        assert!(ns.children[0].definition.is_some());
        assert!(ns.children[1].definition.is_none());

        let point = &tree.root.children[1];
        assert_eq!(
            kinds(point),
            vec!["constructor", "destructor", "field_declaration", "VariableDecl", "Method"]
        );
        // Declared in the class, defined out of line
        let length = &point.children[4];
        assert_eq!(length.display_name, "length");
        assert_eq!(length.definition.as_ref().map(|d| d.line), Some(14));

        let widget = &tree.root.children[2];
        assert!(widget.definition.is_none());
    }

    #[test]
    fn test_strict_mode_rejects_syntax_errors() {
        let source = "struct Broken { int x };\n";
        let lenient = CppFrontend::new().parse_source(source, "broken.cpp");
        assert!(lenient.is_ok());

        let strict = CppFrontend::with_options(CppFrontendOptions {
            strict: true,
            ..Default::default()
        });
        let err = strict.parse_source(source, "broken.cpp").unwrap_err();
        assert!(matches!(err, FrontendError::Syntax { count, .. } if count > 0));
    }

    #[test]
    fn test_preprocessor_conditionals_are_flattened() {
        let source = r#"
#ifdef EXPORT
void exported();
#else
void hidden();
#endif
"#;
        let tree = CppFrontend::new().parse_source(source, "cond.cpp").unwrap();
        let names: Vec<&str> = tree.root.children.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["exported", "hidden"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CppFrontend::new()
            .parse_file(Path::new("does/not/exist.cpp"))
            .unwrap_err();
        let FrontendError::Io { source, .. } = &err else {
            panic!("expected an io error, got {:?}", err);
        };
        assert!(!err.to_string().contains(&source.to_string()));
        assert!(std::error::Error::source(&err).is_some());
    }
}
