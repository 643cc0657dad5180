//! String table
//!
//! Strings are interned to first-seen-order u32 indices. Interning happens in
//! two phases: a [`StringCollector`] grows while the writers run against a
//! counting sink, then it is frozen into a [`StringTable`] whose lookups are
//! read-only. A lookup on the closed table for a string the collector never
//! saw is an error, so every reference in the output is below the table size.
//!
//! Empty strings are never interned. Their reference is index 0, which is a
//! real entry (the file path), so writers guard optional text with a presence
//! byte before referencing it.

use crate::config::EncoderLimits;
use crate::error::EncodeError;
use crate::writer::ByteSink;
use rustc_hash::FxHashMap;

/// Number of characters kept in `StringTooLong` diagnostics
const PREVIEW_CHARS: usize = 32;

/// Source of string references for the node writers
pub trait StringInterner {
    /// Index of `s` in the string table; `""` resolves to 0
    fn string_ref(&mut self, s: &str) -> Result<u32, EncodeError>;
}

/// Phase-one interner: grows on every new string
#[derive(Debug, Default, Clone)]
pub struct StringCollector {
    index: FxHashMap<String, u32>,
    strings: Vec<String>,
}

impl StringCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    /// Intern a string, returning its index.
    ///
    /// Repeated calls with equal strings return the same index. Interning
    /// `""` is a no-op that returns 0.
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        if let Some(&index) = self.index.get(s) {
            return index;
        }

        let index = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), index);
        index
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Close the table; no string can be added afterwards
    pub fn freeze(self) -> StringTable {
        StringTable {
            index: self.index,
            strings: self.strings,
        }
    }
}

impl StringInterner for StringCollector {
    fn string_ref(&mut self, s: &str) -> Result<u32, EncodeError> {
        Ok(self.intern(s))
    }
}

/// Phase-two table: closed, read-only lookups
#[derive(Debug, Clone)]
pub struct StringTable {
    index: FxHashMap<String, u32>,
    strings: Vec<String>,
}

impl StringTable {
    /// Index of `s`, if it was collected
    pub fn lookup(&self, s: &str) -> Option<u32> {
        self.index.get(s).copied()
    }

    /// String at `index`
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    /// Strings in index order
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Number of strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Write `count: u32` then each string as `length: u16` + UTF-8 bytes
    pub fn write_to<W: ByteSink>(
        &self,
        out: &mut W,
        limits: &EncoderLimits,
    ) -> Result<(), EncodeError> {
        let max = limits.effective_max_string_length();
        if self.strings.len() > limits.max_array_count {
            return Err(EncodeError::ArrayCountExceeded {
                context: "string table",
                count: self.strings.len(),
                max: limits.max_array_count,
            });
        }
        out.emit_u32(self.strings.len() as u32);
        for s in &self.strings {
            if s.len() > max {
                return Err(EncodeError::StringTooLong {
                    length: s.len(),
                    max,
                    preview: s.chars().take(PREVIEW_CHARS).collect(),
                });
            }
            out.emit_u16(s.len() as u16);
            out.emit_bytes(s.as_bytes());
        }
        Ok(())
    }
}

impl StringInterner for StringTable {
    fn string_ref(&mut self, s: &str) -> Result<u32, EncodeError> {
        if s.is_empty() {
            return Ok(0);
        }
        self.lookup(s)
            .ok_or_else(|| EncodeError::UnknownString(s.to_string()))
    }
}
