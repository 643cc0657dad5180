//! Encoding and decoding errors

use crate::format::FORMAT_VERSION;
use crate::registry::RelationshipIssue;
use crate::validate::ValidationIssue;
use std::fmt::Display;
use thiserror::Error;

/// Errors that abort an encode call.
///
/// The two validation variants carry every violation found. All other
/// variants surface from the write phases, wrapped in
/// [`EncodeError::Serialization`] with the offset and section they hit.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Structural problems in the input tree
    #[error("IR validation failed with {} issue(s): {}", .0.len(), format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Dangling or inconsistent relationship edges
    #[error("Relationship validation failed with {} issue(s): {}", .0.len(), format_issues(.0))]
    RelationshipValidation(Vec<RelationshipIssue>),

    /// String longer than the table can store
    #[error("String of {length} bytes exceeds the {max}-byte limit: {preview:?}")]
    StringTooLong {
        /// UTF-8 length of the string
        length: usize,
        /// Configured maximum
        max: usize,
        /// Leading characters of the string
        preview: String,
    },

    /// Collection longer than the format allows
    #[error("{context}: {count} elements exceed the limit of {max}")]
    ArrayCountExceeded {
        /// What was being counted
        context: &'static str,
        /// Actual element count
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// A writer referenced a string the collection pass never saw
    #[error("String {0:?} is not in the closed string table")]
    UnknownString(String),

    /// Failure while writing a section
    #[error("Serialization failed at offset {offset} ({context}): {source}")]
    Serialization {
        /// Buffer offset where the failing record started
        offset: usize,
        /// Record or section being written (`class_write`, `function_write`, ...)
        context: &'static str,
        /// Underlying error
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Attach a buffer offset and context tag.
    ///
    /// Errors that already carry a context keep the innermost one, which
    /// points at the smallest enclosing record.
    pub fn at(self, offset: usize, context: &'static str) -> Self {
        match self {
            EncodeError::Validation(_)
            | EncodeError::RelationshipValidation(_)
            | EncodeError::Serialization { .. } => self,
            other => EncodeError::Serialization {
                offset,
                context,
                source: Box::new(other),
            },
        }
    }

    /// The error underneath any serialization wrapper
    pub fn root_cause(&self) -> &EncodeError {
        match self {
            EncodeError::Serialization { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn format_issues<T: Display>(issues: &[T]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while reading an encoded module
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Unexpected end of input
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    /// Invalid UTF-8 string
    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    /// Invalid magic number
    #[error("Invalid magic number: {0:#010x}")]
    InvalidMagic(u32),

    /// Unsupported format version
    #[error("Unsupported format version: {0} (current: {FORMAT_VERSION})")]
    UnsupportedVersion(u16),

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Hex digest stored in the trailer
        expected: String,
        /// Hex digest of the payload
        actual: String,
    },

    /// Unknown variant tag
    #[error("Invalid {kind} tag {tag:#04x} at offset {offset}")]
    InvalidTag {
        /// Tag family (`expression`, `statement`, ...)
        kind: &'static str,
        /// The tag byte
        tag: u8,
        /// Offset of the tag byte
        offset: usize,
    },

    /// String reference outside the string table
    #[error("String reference {index} out of range (table has {count} entries)")]
    InvalidStringRef {
        /// The reference
        index: u32,
        /// String table size
        count: usize,
    },

    /// Bytes left over after the IR data and trailer
    #[error("{0} trailing bytes after IR data")]
    TrailingBytes(usize),

    /// Input nests deeper than the configured limit
    #[error("Nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}
