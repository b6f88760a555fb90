//! Source location tracking, 1-based and LSP-compatible after subtract-one.

use std::fmt;

/// A position (and optional length/end) within a single source file.
///
/// `line` and `column` are 1-based, matching the convention most editors and
/// the `dang` formatter use; LSP positions are 0-based, so LSP-facing code
/// subtracts one before handing these to `lsp_types`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
    pub length: u32,
    pub end: Option<(u32, u32)>,
}

impl SourceLocation {
    pub fn new(filename: impl Into<String>, line: u32, column: u32, length: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
            length,
            end: None,
        }
    }

    pub fn with_end(mut self, end_line: u32, end_column: u32) -> Self {
        self.end = Some((end_line, end_column));
        self
    }

    /// Zero-based (line, column), as LSP expects.
    pub fn lsp_position(&self) -> (u32, u32) {
        (self.line.saturating_sub(1), self.column.saturating_sub(1))
    }

    /// A synthetic location for nodes the parser could not place precisely
    /// (fallback decorations during resilient recovery).
    pub fn synthetic() -> Self {
        Self::new("<unknown>", 1, 1, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}
