// FLAC metadata blocks
//
// Every block starts with a 4-byte header: last-block flag and 7-bit type in
// the first byte, then a 24-bit big-endian body length.

use std::io::Read;

use tracing::trace;

use crate::error::DecodeError;
use crate::utils::io::read_vec;

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// Metadata block types; only the comment block is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// 7..=126, skipped like any other uninterpreted block
    Reserved(u8),
}

impl FlacMetadataBlockType {
    /// `None` for 127, which the format forbids
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => Self::StreamInfo,
            1 => Self::Padding,
            2 => Self::Application,
            3 => Self::SeekTable,
            4 => Self::VorbisComment,
            5 => Self::CueSheet,
            6 => Self::Picture,
            127 => return None,
            other => Self::Reserved(other),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    pub const SIZE: usize = 4;

    pub fn parse(bytes: [u8; Self::SIZE]) -> Result<Self, DecodeError> {
        let block_type = FlacMetadataBlockType::from_byte(bytes[0] & 0x7F)
            .ok_or_else(|| DecodeError::Malformed("invalid FLAC metadata block type".to_string()))?;

        Ok(FlacMetadataBlockHeader {
            is_last: bytes[0] & 0x80 != 0,
            block_type,
            length: u32::from_be_bytes([0, bytes[1], bytes[2], bytes[3]]),
        })
    }
}

/// A metadata block with its body read into memory
#[derive(Debug)]
pub struct FlacMetadataBlock {
    pub header: FlacMetadataBlockHeader,
    pub data: Vec<u8>,
}

impl FlacMetadataBlock {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut bytes = [0u8; FlacMetadataBlockHeader::SIZE];
        reader.read_exact(&mut bytes)?;
        let header = FlacMetadataBlockHeader::parse(bytes)?;
        trace!(block = ?header.block_type, len = header.length, "FLAC metadata block");

        let data = read_vec(reader, header.length as usize)?;
        Ok(FlacMetadataBlock { header, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let header = FlacMetadataBlockHeader::parse([0x84, 0x00, 0x01, 0x02]).unwrap();
        assert!(header.is_last);
        assert_eq!(header.block_type, FlacMetadataBlockType::VorbisComment);
        assert_eq!(header.length, 258);

        let header = FlacMetadataBlockHeader::parse([0x09, 0, 0, 0]).unwrap();
        assert!(!header.is_last);
        assert_eq!(header.block_type, FlacMetadataBlockType::Reserved(9));
    }

    #[test]
    fn test_invalid_block_type() {
        let err = FlacMetadataBlockHeader::parse([0xFF, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_truncated_block_body() {
        let bytes = [0x01u8, 0x00, 0x00, 0x10, 0, 0];
        let err = FlacMetadataBlock::read(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }
}
