//! Encoding pipeline
//!
//! [`IrEncoder`] drives one file through the fixed stage sequence
//!
//! ```text
//! Init → Validate → BuildRelationships → CollectStrings → WriteHeader →
//! WriteStringTable → WriteRelationshipSection → WriteIRData →
//! (WriteChecksum) → Done
//! ```
//!
//! Validation and relationship validation fail with complete issue lists.
//! Every later failure is fatal and carries the offset and record context
//! where it happened. No partial output is ever returned.

use crate::config::EncoderConfig;
use crate::encode::NodeWriter;
use crate::error::EncodeError;
use crate::format::{CHECKSUM_SIZE, FLAG_CHECKSUM, FORMAT_VERSION, HEADER_SIZE, MAGIC};
use crate::registry::{NamingConventionPairing, RelationshipRegistry, StatePairing};
use crate::strings::StringCollector;
use crate::validate::validate_file;
use crate::writer::{BinaryWriter, ByteSink, CountingSink};
use dartir_ir::DartFile;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, warn};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    /// Nothing has run yet
    Init,
    /// Structural validation of the raw tree
    Validate,
    /// Relationship inference and validation
    BuildRelationships,
    /// Dry run of the writers to fill the string table
    CollectStrings,
    /// Magic, version and flags
    WriteHeader,
    /// Closed string table
    WriteStringTable,
    /// Relationship section
    WriteRelationshipSection,
    /// Declarations and their subtrees
    WriteIRData,
    /// SHA-256 trailer
    WriteChecksum,
    /// Output complete
    Done,
}

impl EncodeStage {
    /// Stage name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            EncodeStage::Init => "init",
            EncodeStage::Validate => "validate",
            EncodeStage::BuildRelationships => "build_relationships",
            EncodeStage::CollectStrings => "collect_strings",
            EncodeStage::WriteHeader => "write_header",
            EncodeStage::WriteStringTable => "write_string_table",
            EncodeStage::WriteRelationshipSection => "write_relationship_section",
            EncodeStage::WriteIRData => "write_ir_data",
            EncodeStage::WriteChecksum => "write_checksum",
            EncodeStage::Done => "done",
        }
    }
}

impl fmt::Display for EncodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary IR encoder
pub struct IrEncoder {
    config: EncoderConfig,
    pairing: Box<dyn StatePairing>,
}

impl Default for IrEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl IrEncoder {
    /// Create an encoder that pairs widgets with their state classes by naming convention
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            pairing: Box::new(NamingConventionPairing),
        }
    }

    /// Replace the widget/state pairing strategy
    pub fn with_pairing(mut self, pairing: impl StatePairing + 'static) -> Self {
        self.pairing = Box::new(pairing);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode a file into a fresh buffer
    pub fn encode(&self, file: &DartFile) -> Result<Vec<u8>, EncodeError> {
        self.encode_with(file, |_| {})
    }

    /// Encode a file, letting `augment` add edges to the inferred registry
    /// before it is validated.
    ///
    /// Frontends with analyzer-resolved call graphs use this to record edges
    /// the local inference cannot see.
    pub fn encode_with(
        &self,
        file: &DartFile,
        augment: impl FnOnce(&mut RelationshipRegistry),
    ) -> Result<Vec<u8>, EncodeError> {
        let mut stage = EncodeStage::Init;
        let result = self.run(file, augment, &mut stage);
        if let Err(err) = &result {
            warn!("Encoding {} failed during {}: {}", file.file_path, stage, err);
        }
        result
    }

    fn enter(&self, stage: &mut EncodeStage, next: EncodeStage) {
        *stage = next;
        if self.config.verbose {
            debug!("Encoder stage: {}", next);
        }
    }

    fn run(
        &self,
        file: &DartFile,
        augment: impl FnOnce(&mut RelationshipRegistry),
        stage: &mut EncodeStage,
    ) -> Result<Vec<u8>, EncodeError> {
        let limits = &self.config.limits;

        self.enter(stage, EncodeStage::Validate);
        let issues = validate_file(file, limits);
        if !issues.is_empty() {
            return Err(EncodeError::Validation(issues));
        }

        self.enter(stage, EncodeStage::BuildRelationships);
        let mut registry = RelationshipRegistry::build(file, self.pairing.as_ref());
        augment(&mut registry);
        registry
            .validate()
            .map_err(EncodeError::RelationshipValidation)?;
        let relationships = registry.into_section();

        // Same writers, counting sink: interns every string in first-seen order
        self.enter(stage, EncodeStage::CollectStrings);
        let mut counter = CountingSink::new();
        let mut collector = StringCollector::new();
        {
            let mut writer = NodeWriter::new(&mut counter, &mut collector, limits);
            writer
                .write_ir_data(file)
                .and_then(|()| writer.write_relationships(&relationships))
                .map_err(|e| e.at(0, "string_collection"))?;
        }
        let mut table = collector.freeze();
        if self.config.verbose {
            debug!(
                "Collected {} strings, {} body bytes",
                table.len(),
                counter.offset()
            );
        }

        self.enter(stage, EncodeStage::WriteHeader);
        let mut flags = 0;
        if self.config.checksum {
            flags |= FLAG_CHECKSUM;
        }
        let mut out = BinaryWriter::with_capacity(HEADER_SIZE + counter.offset() + CHECKSUM_SIZE);
        out.emit_u32(MAGIC);
        out.emit_u16(FORMAT_VERSION);
        out.emit_u16(flags);

        self.enter(stage, EncodeStage::WriteStringTable);
        let table_start = out.offset();
        table
            .write_to(&mut out, limits)
            .map_err(|e| e.at(table_start, "string_table_write"))?;

        {
            let mut writer = NodeWriter::new(&mut out, &mut table, limits);

            self.enter(stage, EncodeStage::WriteRelationshipSection);
            writer.write_relationships(&relationships)?;

            self.enter(stage, EncodeStage::WriteIRData);
            let data_start = writer.offset();
            writer
                .write_ir_data(file)
                .map_err(|e| e.at(data_start, "ir_data_write"))?;
        }

        if self.config.checksum {
            self.enter(stage, EncodeStage::WriteChecksum);
            let digest = Sha256::digest(out.buffer());
            if self.config.verbose {
                debug!("SHA-256: {}", hex::encode(digest));
            }
            out.emit_bytes(&digest);
        }

        self.enter(stage, EncodeStage::Done);
        if self.config.verbose {
            debug!(
                "Encoded {} into {} bytes ({} strings)",
                file.file_path,
                out.offset(),
                table.len()
            );
        }
        Ok(out.into_bytes())
    }
}

/// Encode with the default configuration
pub fn encode(file: &DartFile) -> Result<Vec<u8>, EncodeError> {
    IrEncoder::default().encode(file)
}
