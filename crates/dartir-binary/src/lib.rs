//! dartir binary IR format
//!
//! This crate turns a [`DartFile`](dartir_ir::DartFile) tree into a
//! deterministic, versioned, checksummed byte stream, and reads it back.
//!
//! Encoding runs as a fixed pipeline (see [`IrEncoder`]):
//! 1. structural validation of the raw tree (`validate`)
//! 2. relationship registry build and validation (`registry`)
//! 3. string collection into a table that is closed before writing (`strings`)
//! 4. header, string table, relationship section and IR data (`encode`)
//! 5. optional SHA-256 trailer
//!
//! # Example
//!
//! ```rust,ignore
//! use dartir_binary::{decode, IrEncoder, EncoderConfig};
//! use dartir_ir::DartFile;
//!
//! let file = DartFile::new("lib/main.dart", "3f2a");
//! let bytes = IrEncoder::new(EncoderConfig::default()).encode(&file)?;
//! let module = decode(&bytes)?;
//! assert_eq!(module.file.file_path, "lib/main.dart");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod decode;
pub mod encode;
pub mod encoder;
pub mod error;
pub mod format;
pub mod reader;
pub mod registry;
pub mod strings;
pub mod validate;
pub mod writer;

pub use config::{EncoderConfig, EncoderLimits};
pub use decode::{decode, decode_with, DecodedModule, Header};
pub use encode::NodeWriter;
pub use encoder::{encode, EncodeStage, IrEncoder};
pub use error::{DecodeError, EncodeError};
pub use registry::{
    LifecycleMethod, NamingConventionPairing, RelationshipIssue, RelationshipRegistry,
    RelationshipSection, StatePairing,
};
pub use strings::{StringCollector, StringInterner, StringTable};
pub use validate::{validate_file, ValidationIssue};
pub use writer::{BinaryWriter, ByteSink, CountingSink};
pub use reader::BinaryReader;
