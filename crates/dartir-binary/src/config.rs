//! Encoder configuration

use crate::format::MAX_WIRE_STRING_LENGTH;
use serde::{Deserialize, Serialize};

/// Options for an [`IrEncoder`](crate::IrEncoder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Append a SHA-256 trailer and set header flag bit 0
    pub checksum: bool,
    /// Emit per-stage diagnostics through `tracing`; never changes the bytes
    pub verbose: bool,
    /// Structural ceilings enforced by validation and the writers
    pub limits: EncoderLimits,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            checksum: true,
            verbose: false,
            limits: EncoderLimits::default(),
        }
    }
}

impl EncoderConfig {
    /// Parse a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enable or disable the checksum trailer
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Enable or disable verbose diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replace the limits
    pub fn with_limits(mut self, limits: EncoderLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Size ceilings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderLimits {
    /// Longest string the table accepts, in UTF-8 bytes (clamped to the u16 wire limit)
    pub max_string_length: usize,
    /// Longest file path
    pub max_path_length: usize,
    /// Longest declaration name
    pub max_name_length: usize,
    /// Most classes per file
    pub max_classes: usize,
    /// Most top-level functions per file
    pub max_functions: usize,
    /// Most imports per file
    pub max_imports: usize,
    /// Most parameters per function
    pub max_parameters: usize,
    /// Longest `show`/`hide` list
    pub max_show_hide: usize,
    /// Longest collection the writers accept
    pub max_array_count: usize,
    /// Deepest expression/statement nesting
    pub max_nesting_depth: usize,
}

impl Default for EncoderLimits {
    fn default() -> Self {
        Self {
            max_string_length: MAX_WIRE_STRING_LENGTH,
            max_path_length: 4096,
            max_name_length: 1024,
            max_classes: 10_000,
            max_functions: 10_000,
            max_imports: 1_000,
            max_parameters: 255,
            max_show_hide: 1_000,
            max_array_count: 1_000_000,
            max_nesting_depth: 128,
        }
    }
}

impl EncoderLimits {
    /// String limit actually enforced: the configured value, capped by the u16 length prefix
    pub fn effective_max_string_length(&self) -> usize {
        self.max_string_length.min(MAX_WIRE_STRING_LENGTH)
    }
}
