//! Source locations and file identities.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Identity of a source file, compared by normalised path.
///
/// `./` segments are dropped so that `./test.cpp` and `test.cpp` name the
/// same file. No filesystem access happens here: symlinks and `..` segments
/// are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity(PathBuf);

impl FileIdentity {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let normalized: PathBuf = path
            .as_ref()
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        if normalized.as_os_str().is_empty() {
            Self(PathBuf::from("."))
        } else {
            Self(normalized)
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<&Path> for FileIdentity {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for FileIdentity {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A position in a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Originating file; `None` for builtin or synthetic declarations
    pub file: Option<FileIdentity>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<FileIdentity>, line: u32, column: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column,
        }
    }

    /// A location that has no originating file.
    pub fn builtin(line: u32, column: u32) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Whether this location lies in `target`. A missing file never matches.
    pub fn is_in(&self, target: &FileIdentity) -> bool {
        self.file.as_ref() == Some(target)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}
