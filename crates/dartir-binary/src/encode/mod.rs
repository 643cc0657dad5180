//! Tagged node writers
//!
//! [`NodeWriter`] writes every part of the module after the string table.
//! It is generic over the byte sink and the string interner so the same
//! code runs twice per encode: once against a [`CountingSink`] with a
//! [`StringCollector`] to gather strings, once against the real buffer with
//! the closed [`StringTable`]. The two runs cannot drift apart because they
//! are the same code.
//!
//! The impl blocks are split by tree: `types`, `expr`, `stmt`, `decl`,
//! `component` and `relationships`.
//!
//! [`CountingSink`]: crate::writer::CountingSink
//! [`StringCollector`]: crate::strings::StringCollector
//! [`StringTable`]: crate::strings::StringTable

mod component;
mod decl;
mod expr;
mod relationships;
mod stmt;
mod types;

use crate::config::EncoderLimits;
use crate::error::EncodeError;
use crate::format::UNKNOWN_LIBRARY;
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::{DartFile, Metadata, SourceLocation};

/// Writer for everything that references the string table
pub struct NodeWriter<'a, W: ByteSink, S: StringInterner> {
    out: &'a mut W,
    strings: &'a mut S,
    limits: &'a EncoderLimits,
}

impl<'a, W: ByteSink, S: StringInterner> NodeWriter<'a, W, S> {
    /// Create a writer over a sink and an interner
    pub fn new(out: &'a mut W, strings: &'a mut S, limits: &'a EncoderLimits) -> Self {
        Self {
            out,
            strings,
            limits,
        }
    }

    /// Current sink offset
    pub fn offset(&self) -> usize {
        self.out.offset()
    }

    /// Write the IR data section.
    ///
    /// The file path is the first string referenced, so it always lands at
    /// index 0 of the string table.
    pub fn write_ir_data(&mut self, file: &DartFile) -> Result<(), EncodeError> {
        self.str_ref(&file.file_path)?;
        self.str_ref(&file.content_hash)?;
        let library = file
            .library_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_LIBRARY);
        self.str_ref(library)?;
        self.out.emit_u64(file.analyzed_at_ms);

        self.list(&file.imports, "imports", Self::write_import)?;
        self.list(&file.exports, "exports", Self::write_export)?;
        self.list(&file.parts, "parts", Self::write_part)?;
        self.list(&file.variables, "variables", Self::write_variable)?;
        self.list(&file.functions, "functions", Self::write_function)?;
        self.list(&file.classes, "classes", Self::write_class)?;
        self.list(&file.analysis_issues, "analysis issues", Self::write_analysis_issue)?;
        Ok(())
    }

    // ===== Primitives =====

    /// Run `f`, tagging any failure with the offset where it started
    fn in_context<T>(
        &mut self,
        context: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, EncodeError>,
    ) -> Result<T, EncodeError> {
        let start = self.offset();
        f(self).map_err(|e| e.at(start, context))
    }

    /// String reference; `""` writes 0
    fn str_ref(&mut self, s: &str) -> Result<(), EncodeError> {
        let index = self.strings.string_ref(s)?;
        self.out.emit_u32(index);
        Ok(())
    }

    /// Possibly-empty text: presence byte, then a reference iff non-empty
    fn text(&mut self, s: &str) -> Result<(), EncodeError> {
        self.opt_text(Some(s))
    }

    /// Optional text; `Some("")` is written like `None`
    fn opt_text(&mut self, s: Option<&str>) -> Result<(), EncodeError> {
        match s.filter(|s| !s.is_empty()) {
            Some(s) => {
                self.out.emit_u8(1);
                self.str_ref(s)
            }
            None => {
                self.out.emit_u8(0);
                Ok(())
            }
        }
    }

    fn texts(&mut self, items: &[String], context: &'static str) -> Result<(), EncodeError> {
        self.list(items, context, |w, item| w.text(item))
    }

    /// Presence byte, then the value iff present
    fn optional<T>(
        &mut self,
        value: Option<T>,
        write: impl FnOnce(&mut Self, T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        self.out.emit_bool(value.is_some());
        match value {
            Some(value) => write(self, value),
            None => Ok(()),
        }
    }

    /// Count, then every element
    fn list<T>(
        &mut self,
        items: &[T],
        context: &'static str,
        mut write: impl FnMut(&mut Self, &T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        self.count(items.len(), context)?;
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Collection length as u32
    fn count(&mut self, len: usize, context: &'static str) -> Result<(), EncodeError> {
        let max = self.limits.max_array_count.min(u32::MAX as usize);
        if len > max {
            return Err(EncodeError::ArrayCountExceeded {
                context,
                count: len,
                max,
            });
        }
        self.out.emit_u32(len as u32);
        Ok(())
    }

    fn flag(&mut self, value: bool) {
        self.out.emit_bool(value);
    }

    /// File ref (0 for an empty file, which reads back as the module's own path),
    /// then line, column, offset and length
    fn location(&mut self, location: &SourceLocation) -> Result<(), EncodeError> {
        self.str_ref(&location.file)?;
        self.out.emit_u32(location.line);
        self.out.emit_u32(location.column);
        self.out.emit_u32(location.offset);
        self.out.emit_u32(location.length);
        Ok(())
    }

    fn metadata(&mut self, metadata: &Metadata) -> Result<(), EncodeError> {
        self.count(metadata.len(), "metadata")?;
        for (key, value) in metadata {
            self.text(key)?;
            self.text(value)?;
        }
        Ok(())
    }
}
