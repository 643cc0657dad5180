//! Byte sinks
//!
//! Encoders write through the [`ByteSink`] trait so the same code can target a
//! real buffer ([`BinaryWriter`]) or just measure output ([`CountingSink`])
//! during the string-collection pass.

/// Append-only little-endian byte sink
pub trait ByteSink {
    /// Append raw bytes
    fn emit_bytes(&mut self, bytes: &[u8]);

    /// Number of bytes written so far
    fn offset(&self) -> usize;

    /// Emit a raw byte
    fn emit_u8(&mut self, value: u8) {
        self.emit_bytes(&[value]);
    }

    /// Emit a 16-bit unsigned integer (little-endian)
    fn emit_u16(&mut self, value: u16) {
        self.emit_bytes(&value.to_le_bytes());
    }

    /// Emit a 32-bit unsigned integer (little-endian)
    fn emit_u32(&mut self, value: u32) {
        self.emit_bytes(&value.to_le_bytes());
    }

    /// Emit a 64-bit unsigned integer (little-endian)
    fn emit_u64(&mut self, value: u64) {
        self.emit_bytes(&value.to_le_bytes());
    }

    /// Emit a 64-bit signed integer (little-endian)
    fn emit_i64(&mut self, value: i64) {
        self.emit_bytes(&value.to_le_bytes());
    }

    /// Emit a 64-bit float (little-endian)
    fn emit_f64(&mut self, value: f64) {
        self.emit_bytes(&value.to_le_bytes());
    }

    /// Emit a boolean as 0 or 1
    fn emit_bool(&mut self, value: bool) {
        self.emit_u8(value as u8);
    }
}

/// Vec-backed sink holding the encoded module
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a writer with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteSink for BinaryWriter {
    fn emit_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn offset(&self) -> usize {
        self.buffer.len()
    }
}

/// Sink that discards bytes and only counts them
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    written: usize,
}

impl CountingSink {
    /// Create a sink at offset zero
    pub fn new() -> Self {
        Self { written: 0 }
    }
}

impl ByteSink for CountingSink {
    fn emit_bytes(&mut self, bytes: &[u8]) {
        self.written += bytes.len();
    }

    fn offset(&self) -> usize {
        self.written
    }
}
