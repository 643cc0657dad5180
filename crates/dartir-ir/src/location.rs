//! Source locations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node in its source file.
///
/// `line` and `column` are 1-indexed, `offset` and `length` are byte counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the file containing the node
    pub file: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset from the start of the file
    pub offset: u32,
    /// Length of the node in bytes
    pub length: u32,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
            length,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
