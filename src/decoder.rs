// Tag decoder adapter
//
// Turns a file path into the raw tag structure the normalizer consumes.
// Containers are recognised by their magic bytes, never by extension.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::DecodeError;
use crate::flac::{self, VorbisComment, FLAC_SIGNATURE};
use crate::id3::{Id3Frame, Id3v2Tag};
use crate::ogg::{self, OGG_SIGNATURE};
use crate::wav::{self, RIFF_SIGNATURE, WAVE_FORMAT};

/// Raw tags of one file, in exactly one tag format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedTags {
    /// Xiph comment fields from FLAC or Ogg
    Vorbis(VorbisComment),
    /// ID3v2 frames in stored order
    Id3v2(Vec<Id3Frame>),
    /// The file carries no tag structure we read
    Unsupported,
}

/// Source of raw tags for a path
pub trait TagDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedTags, DecodeError>;
}

/// Decoder backed by the in-crate ID3v2, FLAC, Ogg and RIFF readers
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDecoder;

impl TagDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedTags, DecodeError> {
        let file = File::open(path)?;
        decode_reader(&mut BufReader::new(file))
    }
}

/// Decode tags from any seekable byte source
pub fn decode_reader<R: Read + Seek>(reader: &mut R) -> Result<DecodedTags, DecodeError> {
    let mut magic = [0u8; 12];
    let read = fill(reader, &mut magic)?;
    let magic = &magic[..read];
    reader.seek(SeekFrom::Start(0))?;

    if magic.starts_with(b"ID3") {
        return decode_id3_prefixed(reader);
    }
    if magic.starts_with(FLAC_SIGNATURE) {
        return Ok(match flac::read_vorbis_comment(reader)? {
            Some(comment) => DecodedTags::Vorbis(comment),
            None => DecodedTags::Unsupported,
        });
    }
    if magic.starts_with(OGG_SIGNATURE) {
        return Ok(match ogg::read_vorbis_comment(reader)? {
            Some(comment) => DecodedTags::Vorbis(comment),
            None => DecodedTags::Unsupported,
        });
    }
    if magic.len() == 12 && magic.starts_with(RIFF_SIGNATURE) && &magic[8..12] == WAVE_FORMAT {
        return Ok(match wav::read_id3_chunk(reader)? {
            Some(tag) => DecodedTags::Id3v2(tag.frames),
            None => DecodedTags::Unsupported,
        });
    }

    debug!("no recognised container signature");
    Ok(DecodedTags::Unsupported)
}

/// An ID3v2 tag at offset 0: plain MP3, or FLAC with a leading ID3 tag.
/// A Vorbis comment after the tag takes precedence over the ID3 frames.
fn decode_id3_prefixed<R: Read + Seek>(reader: &mut R) -> Result<DecodedTags, DecodeError> {
    let tag = match Id3v2Tag::read(reader)? {
        Some(tag) => tag,
        None => return Ok(DecodedTags::Unsupported),
    };

    reader.seek(SeekFrom::Start(tag.header.total_size()))?;
    let mut next = [0u8; 4];
    if fill(reader, &mut next)? == next.len() && &next == FLAC_SIGNATURE {
        reader.seek(SeekFrom::Start(tag.header.total_size()))?;
        if let Some(comment) = flac::read_vorbis_comment(reader)? {
            debug!("FLAC stream behind ID3v2 tag, using Vorbis comment");
            return Ok(DecodedTags::Vorbis(comment));
        }
    }

    Ok(DecodedTags::Id3v2(tag.frames))
}

fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn id3_tag(frames: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (id, data) in frames {
            body.extend_from_slice(id.as_bytes());
            body.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(&[0, 0]);
            body.extend_from_slice(data);
        }
        let size = body.len() as u32;
        let mut tag = vec![b'I', b'D', b'3', 3, 0, 0];
        tag.extend_from_slice(&[
            ((size >> 21) & 0x7F) as u8,
            ((size >> 14) & 0x7F) as u8,
            ((size >> 7) & 0x7F) as u8,
            (size & 0x7F) as u8,
        ]);
        tag.extend(body);
        tag
    }

    fn flac_stream(comment: &VorbisComment) -> Vec<u8> {
        let data = comment.to_bytes();
        let len = data.len() as u32;
        let mut out = FLAC_SIGNATURE.to_vec();
        out.extend_from_slice(&[0x84, (len >> 16) as u8, (len >> 8) as u8, len as u8]);
        out.extend(data);
        out
    }

    #[test]
    fn test_mp3_yields_id3_frames() {
        let mut bytes = id3_tag(&[("TIT2", b"\x03Song A"), ("TPE1", b"\x03Artist X")]);
        bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);

        match decode_reader(&mut Cursor::new(bytes)).unwrap() {
            DecodedTags::Id3v2(frames) => {
                assert_eq!(frames.len(), 2);
                assert_eq!(frames[0].id(), "TIT2");
            }
            other => panic!("expected ID3v2, got {:?}", other),
        }
    }

    #[test]
    fn test_flac_prefers_vorbis_over_leading_id3() {
        let comment = VorbisComment::from_fields([("GENRE", "Rock")]);
        let mut bytes = id3_tag(&[("TIT2", b"\x03Ignored")]);
        bytes.extend(flac_stream(&comment));

        assert_eq!(
            decode_reader(&mut Cursor::new(bytes)).unwrap(),
            DecodedTags::Vorbis(comment)
        );
    }

    #[test]
    fn test_plain_flac() {
        let comment = VorbisComment::from_fields([("TITLE", "Song")]);
        assert_eq!(
            decode_reader(&mut Cursor::new(flac_stream(&comment))).unwrap(),
            DecodedTags::Vorbis(comment)
        );
    }

    fn riff_wave(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut body = WAVE_FORMAT.to_vec();
        for (id, data) in chunks {
            body.extend_from_slice(*id);
            body.extend_from_slice(&(data.len() as u32).to_le_bytes());
            body.extend_from_slice(data);
            if data.len() % 2 == 1 {
                body.push(0);
            }
        }
        let mut out = RIFF_SIGNATURE.to_vec();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend(body);
        out
    }

    #[test]
    fn test_ogg_vorbis_yields_comment() {
        use crate::ogg::page::build_page;

        let comment = VorbisComment::from_fields([("GENRE", "Rock"), ("GENRE", "Indie")]);
        let mut ident = b"\x01vorbis".to_vec();
        ident.extend_from_slice(&[0u8; 23]);
        let mut packet = b"\x03vorbis".to_vec();
        packet.extend(comment.to_bytes());
        packet.push(1);

        let mut bytes = build_page(4, 0, 0x02, &[&ident]);
        bytes.extend(build_page(4, 1, 0, &[&packet]));

        match decode_reader(&mut Cursor::new(bytes)).unwrap() {
            DecodedTags::Vorbis(found) => assert_eq!(found.comments, comment.comments),
            other => panic!("expected Vorbis, got {:?}", other),
        }
    }

    #[test]
    fn test_wav_id3_chunk_yields_frames() {
        let tag = id3_tag(&[("TIT2", b"\x03Song W"), ("TXXX", b"\x03Mood\x00Calm")]);
        let bytes = riff_wave(&[(b"fmt ", &[0u8; 16]), (b"data", &[1, 2, 3]), (b"id3 ", &tag)]);

        match decode_reader(&mut Cursor::new(bytes)).unwrap() {
            DecodedTags::Id3v2(frames) => {
                let ids: Vec<_> = frames.iter().map(|f| f.id()).collect();
                assert_eq!(ids, vec!["TIT2", "TXXX"]);
            }
            other => panic!("expected ID3v2, got {:?}", other),
        }
    }

    #[test]
    fn test_wav_without_id3_chunk_is_unsupported() {
        let bytes = riff_wave(&[(b"fmt ", &[0u8; 16]), (b"data", &[0u8; 4])]);
        assert_eq!(decode_reader(&mut Cursor::new(bytes)).unwrap(), DecodedTags::Unsupported);
    }

    #[test]
    fn test_untagged_bytes_are_unsupported() {
        let bytes = vec![0xFF, 0xFB, 0x90, 0x00, 0, 0, 0, 0];
        assert_eq!(decode_reader(&mut Cursor::new(bytes)).unwrap(), DecodedTags::Unsupported);
        assert_eq!(decode_reader(&mut Cursor::new(Vec::new())).unwrap(), DecodedTags::Unsupported);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileDecoder.decode(Path::new("/nonexistent/track.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }
}
