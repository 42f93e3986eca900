// RIFF/WAVE support
//
// WAV files carry ID3v2 tags in an "id3 " (sometimes "ID3 ") chunk at the top
// level of the RIFF container. Chunks are word-aligned: odd-sized chunks are
// followed by one pad byte.

use std::io::{Read, Seek, SeekFrom};

use tracing::trace;

use crate::error::DecodeError;
use crate::id3::Id3v2Tag;
use crate::utils::io::{read_le_u32, read_vec};

pub const RIFF_SIGNATURE: &[u8; 4] = b"RIFF";
pub const WAVE_FORMAT: &[u8; 4] = b"WAVE";

/// Locate and parse the ID3v2 chunk of a RIFF/WAVE stream.
///
/// The reader must be positioned at the `RIFF` signature.
pub fn read_id3_chunk<R: Read + Seek>(reader: &mut R) -> Result<Option<Id3v2Tag>, DecodeError> {
    let mut riff = [0u8; 12];
    reader.read_exact(&mut riff)?;
    if &riff[0..4] != RIFF_SIGNATURE || &riff[8..12] != WAVE_FORMAT {
        return Err(DecodeError::Malformed("not a RIFF/WAVE stream".to_string()));
    }

    loop {
        let mut chunk_id = [0u8; 4];
        match reader.read_exact(&mut chunk_id) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let size = read_le_u32(reader)?;
        trace!(chunk = %String::from_utf8_lossy(&chunk_id), size, "RIFF chunk");

        if chunk_id.eq_ignore_ascii_case(b"id3 ") {
            let chunk = read_vec(reader, size as usize)?;
            return Id3v2Tag::read(&mut chunk.as_slice());
        }

        let skip = size as i64 + (size & 1) as i64;
        reader.seek(SeekFrom::Current(skip))?;
    }
}
