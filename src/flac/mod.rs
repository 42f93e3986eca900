// FLAC metadata handling module

pub mod metadata;
pub mod vorbis;

use std::io::Read;

use crate::error::DecodeError;

pub use metadata::{FlacMetadataBlock, FlacMetadataBlockHeader, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use vorbis::VorbisComment;

/// Walk the metadata blocks following a `fLaC` signature and return the
/// first VORBIS_COMMENT block, if any.
pub fn read_vorbis_comment<R: Read>(reader: &mut R) -> Result<Option<VorbisComment>, DecodeError> {
    let mut signature = [0u8; 4];
    reader.read_exact(&mut signature)?;
    if &signature != FLAC_SIGNATURE {
        return Err(DecodeError::Malformed("missing fLaC signature".to_string()));
    }

    loop {
        let block = FlacMetadataBlock::read(reader)?;
        if block.header.block_type == FlacMetadataBlockType::VorbisComment {
            return VorbisComment::read(&mut block.data.as_slice()).map(Some);
        }

        if block.header.is_last {
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn block(block_type: u8, is_last: bool, data: &[u8]) -> Vec<u8> {
        let len = data.len() as u32;
        let mut out = vec![
            block_type | if is_last { 0x80 } else { 0 },
            (len >> 16) as u8,
            (len >> 8) as u8,
            len as u8,
        ];
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_finds_comment_after_streaminfo() {
        let comment = VorbisComment::from_fields([("TITLE", "Song")]);
        let mut bytes = FLAC_SIGNATURE.to_vec();
        bytes.extend(block(0, false, &[0u8; 34]));
        bytes.extend(block(4, true, &comment.to_bytes()));

        let found = read_vorbis_comment(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(found, Some(comment));
    }

    #[test]
    fn test_no_comment_block() {
        let mut bytes = FLAC_SIGNATURE.to_vec();
        bytes.extend(block(0, true, &[0u8; 34]));
        assert_eq!(read_vorbis_comment(&mut Cursor::new(bytes)).unwrap(), None);
    }

    #[test]
    fn test_bad_signature() {
        let result = read_vorbis_comment(&mut Cursor::new(b"OggS....".to_vec()));
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }
}
