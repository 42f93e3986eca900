// OGG Vorbis / Opus comment support
//
// The first packet of a logical stream identifies the codec; the second
// carries the comment header:
// - Vorbis: "\x03vorbis" + Vorbis comment + framing bit
// - Opus:   "OpusTags" + Vorbis comment
// - FLAC:   one FLAC metadata block per header packet after the
//           "\x7FFLAC" mapping packet, which embeds STREAMINFO

pub mod page;

use std::io::Read;

use tracing::debug;

use crate::error::DecodeError;
use crate::flac::{FlacMetadataBlock, FlacMetadataBlockType, VorbisComment};
use page::PacketReader;

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

const VORBIS_IDENT: &[u8; 7] = b"\x01vorbis";
const VORBIS_COMMENT: &[u8; 7] = b"\x03vorbis";
const OPUS_HEAD: &[u8; 8] = b"OpusHead";
const OPUS_TAGS: &[u8; 8] = b"OpusTags";
const FLAC_MAPPING: &[u8; 5] = b"\x7FFLAC";
/// Offset of the STREAMINFO block header inside the FLAC mapping packet
const FLAC_STREAMINFO_OFFSET: usize = 13;

/// Read the comment header of an Ogg Vorbis, Opus or FLAC stream.
///
/// Returns `Ok(None)` for other codecs.
pub fn read_vorbis_comment<R: Read>(reader: R) -> Result<Option<VorbisComment>, DecodeError> {
    let mut packets = PacketReader::new(reader);

    let ident = packets
        .next_packet()?
        .ok_or_else(|| DecodeError::Malformed("empty Ogg stream".to_string()))?;

    if ident.starts_with(FLAC_MAPPING) {
        let streaminfo = *ident
            .get(FLAC_STREAMINFO_OFFSET)
            .ok_or_else(|| DecodeError::Malformed("truncated Ogg FLAC mapping header".to_string()))?;
        // STREAMINFO flagged last: no further metadata blocks
        if streaminfo & 0x80 != 0 {
            return Ok(None);
        }
        return read_flac_comment(&mut packets);
    }

    let comment_magic: &[u8] = if ident.starts_with(VORBIS_IDENT) {
        &VORBIS_COMMENT[..]
    } else if ident.starts_with(OPUS_HEAD) {
        &OPUS_TAGS[..]
    } else {
        debug!("Ogg stream carries neither Vorbis nor Opus");
        return Ok(None);
    };

    let comment = packets
        .next_packet()?
        .ok_or_else(|| DecodeError::Malformed("missing Ogg comment header".to_string()))?;
    if !comment.starts_with(comment_magic) {
        return Err(DecodeError::Malformed("second Ogg packet is not a comment header".to_string()));
    }

    VorbisComment::read(&mut &comment[comment_magic.len()..]).map(Some)
}

/// Walk the FLAC metadata blocks carried one per packet
fn read_flac_comment<R: Read>(packets: &mut PacketReader<R>) -> Result<Option<VorbisComment>, DecodeError> {
    while let Some(packet) = packets.next_packet()? {
        let block = FlacMetadataBlock::read(&mut packet.as_slice())?;
        if block.header.block_type == FlacMetadataBlockType::VorbisComment {
            return VorbisComment::read(&mut block.data.as_slice()).map(Some);
        }
        if block.header.is_last {
            return Ok(None);
        }
    }
    Ok(None)
}
