//! Rendered outline lines.

use std::fmt;

/// Printed in place of a definition reference when a declaration has none.
pub const ABSENT_DEFINITION: &str = "<undefined>";

/// One rendered line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    /// Nesting depth (0 for declarations directly below the root)
    pub depth: usize,
    /// Literal line text
    pub text: String,
}

impl OutlineLine {
    pub fn new(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
        }
    }

    /// The text prefixed with `width` spaces per nesting level.
    pub fn indented(&self, width: usize) -> String {
        format!("{:indent$}{}", "", self.text, indent = self.depth * width)
    }
}

impl fmt::Display for OutlineLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented() {
        let line = OutlineLine::new(2, "function <undefined>");
        assert_eq!(line.indented(0), "function <undefined>");
        assert_eq!(line.indented(2), "    function <undefined>");
        assert_eq!(line.to_string(), "function <undefined>");
    }
}
