//! Decoder for encoded modules
//!
//! Reads the header, verifies the checksum trailer when flagged, then reads
//! the string table, the relationship section and the IR data back into a
//! [`DartFile`]. The decoded file equals the encoded one up to the lossy
//! parts of the format: non-native types come back in their wire form,
//! `Some("")` optional text comes back as `None`, an empty library name
//! comes back as `None` and an empty location file comes back as the
//! module's own path.
//!
//! Recursion is bounded by [`EncoderLimits::max_nesting_depth`], counted the
//! same way the validator counts it, so every module the encoder accepts
//! decodes under the same limits.

mod decls;
mod nodes;
mod relationships;

use crate::config::EncoderLimits;
use crate::error::DecodeError;
use crate::format::{CHECKSUM_SIZE, FLAG_CHECKSUM, FORMAT_VERSION, HEADER_SIZE, MAGIC};
use crate::reader::BinaryReader;
use crate::registry::RelationshipSection;
use dartir_ir::DartFile;
use nodes::NodeReader;
use sha2::{Digest, Sha256};

/// Module header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Magic number (`b"DIRB"` read as a little-endian u32)
    pub magic: u32,
    /// Format version
    pub version: u16,
    /// Flag bits
    pub flags: u16,
}

impl Header {
    /// Check if a SHA-256 trailer follows the IR data
    pub fn has_checksum(&self) -> bool {
        self.flags & FLAG_CHECKSUM != 0
    }

    fn read(reader: &mut BinaryReader<'_>) -> Result<Self, DecodeError> {
        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(DecodeError::InvalidMagic(magic));
        }
        let version = reader.read_u16()?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let flags = reader.read_u16()?;
        Ok(Self {
            magic,
            version,
            flags,
        })
    }
}

/// Everything read back from an encoded module
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedModule {
    /// Module header
    pub header: Header,
    /// String table in index order
    pub strings: Vec<String>,
    /// Relationship section
    pub relationships: RelationshipSection,
    /// Decoded IR tree
    pub file: DartFile,
    /// Stored SHA-256 trailer, if the module carries one
    pub checksum: Option<[u8; CHECKSUM_SIZE]>,
}

/// Decode a module with the default limits
pub fn decode(bytes: &[u8]) -> Result<DecodedModule, DecodeError> {
    decode_with(bytes, &EncoderLimits::default())
}

/// Decode a module, bounding nesting depth by `limits`
pub fn decode_with(bytes: &[u8], limits: &EncoderLimits) -> Result<DecodedModule, DecodeError> {
    let header = Header::read(&mut BinaryReader::new(bytes))?;

    let (body, checksum) = if header.has_checksum() {
        let split = bytes
            .len()
            .checked_sub(CHECKSUM_SIZE)
            .filter(|split| *split >= HEADER_SIZE)
            .ok_or(DecodeError::UnexpectedEnd(bytes.len()))?;
        let (body, trailer) = bytes.split_at(split);
        let actual = Sha256::digest(body);
        if actual.as_slice() != trailer {
            return Err(DecodeError::ChecksumMismatch {
                expected: hex::encode(trailer),
                actual: hex::encode(actual),
            });
        }
        let mut stored = [0u8; CHECKSUM_SIZE];
        stored.copy_from_slice(trailer);
        (body, Some(stored))
    } else {
        (bytes, None)
    };

    let mut reader = BinaryReader::at(body, HEADER_SIZE);
    let strings = read_string_table(&mut reader)?;

    let mut nodes = NodeReader::new(reader, &strings, limits);
    let relationships = nodes.read_relationships()?;
    let file = nodes.read_ir_data()?;

    let reader = nodes.into_reader();
    if !reader.is_at_end() {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }

    Ok(DecodedModule {
        header,
        strings,
        relationships,
        file,
        checksum,
    })
}

fn read_string_table(reader: &mut BinaryReader<'_>) -> Result<Vec<String>, DecodeError> {
    let count = reader.read_u32()? as usize;
    // every entry takes at least its two length bytes
    let mut strings = Vec::with_capacity(count.min(reader.remaining() / 2));
    for _ in 0..count {
        strings.push(reader.read_short_string()?);
    }
    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::encoder::{encode, IrEncoder};

    fn empty_module(checksum: bool) -> Vec<u8> {
        IrEncoder::new(EncoderConfig::default().with_checksum(checksum))
            .encode(&DartFile::new("a.dart", "h"))
            .unwrap()
    }

    #[test]
    fn test_decode_empty_file() {
        let module = decode(&empty_module(false)).unwrap();
        assert_eq!(module.header.flags, 0);
        assert_eq!(module.strings, vec!["a.dart", "h", "<unknown>"]);
        assert!(module.relationships.is_empty());
        assert_eq!(module.file, DartFile::new("a.dart", "h"));
        assert!(module.checksum.is_none());
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = empty_module(false);
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(DecodeError::InvalidMagic(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = empty_module(false);
        bytes[4] = 9;
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut bytes = empty_module(true);
        bytes[HEADER_SIZE + 6] ^= 0x20;
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_checksum_is_returned() {
        let bytes = encode(&DartFile::new("a.dart", "h")).unwrap();
        let module = decode(&bytes).unwrap();
        assert_eq!(
            module.checksum.as_ref().map(|c| c.as_slice()),
            Some(&bytes[bytes.len() - CHECKSUM_SIZE..])
        );
    }

    #[test]
    fn test_truncated_checksum() {
        let bytes = empty_module(true);
        assert!(matches!(
            decode(&bytes[..HEADER_SIZE + 4]),
            Err(DecodeError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = empty_module(false);
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(decode(&bytes), Err(DecodeError::TrailingBytes(2))));
    }

    #[test]
    fn test_truncated_body() {
        let bytes = empty_module(false);
        assert!(matches!(
            decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::UnexpectedEnd(_))
        ));
    }
}
