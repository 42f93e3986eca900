// ID3v2.3 / ID3v2.4 tag reader

use std::io::Read;

use tracing::trace;

use crate::error::DecodeError;
use crate::utils::io::{read_vec, synchsafe_u32};

/// ID3v2 header structure
#[derive(Debug, Clone, Copy)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    /// Size of the tag body, excluding the 10-byte header
    pub size: u32,
}

/// ID3v2 tag structure
#[derive(Debug)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
    pub frames: Vec<Id3Frame>,
}

/// One ID3v2 frame with its body in stored order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame {
    pub frame_id: String,
    pub(crate) data: Vec<u8>,
    pub(crate) compressed: bool,
    pub(crate) encrypted: bool,
}

impl Id3v2Header {
    pub const HEADER_SIZE: usize = 10;
    const ID: [u8; 3] = *b"ID3";

    const FLAG_UNSYNCHRONISATION: u8 = 0x80;
    const FLAG_EXTENDED_HEADER: u8 = 0x40;
    const FLAG_FOOTER: u8 = 0x10;

    /// Parse a header from its 10 raw bytes; `None` if the magic is absent
    pub fn parse(buffer: &[u8; Self::HEADER_SIZE]) -> Option<Self> {
        if buffer[0..3] != Self::ID {
            return None;
        }

        Some(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: synchsafe_u32([buffer[6], buffer[7], buffer[8], buffer[9]]),
        })
    }

    /// Read ID3v2 header from reader
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Option<Self>> {
        let mut buffer = [0u8; Self::HEADER_SIZE];
        reader.read_exact(&mut buffer)?;
        Ok(Self::parse(&buffer))
    }

    /// Total bytes the tag occupies on disk, header and footer included
    pub fn total_size(&self) -> u64 {
        let footer = if self.version.0 >= 4 && self.flags & Self::FLAG_FOOTER != 0 {
            Self::HEADER_SIZE as u64
        } else {
            0
        };
        Self::HEADER_SIZE as u64 + self.size as u64 + footer
    }
}

impl Id3v2Tag {
    /// Read an ID3v2 tag from the reader's current position.
    ///
    /// Returns `Ok(None)` when no `ID3` header is present. ID3v2.2 and
    /// unknown major versions are rejected as unsupported.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>, DecodeError> {
        let header = match Id3v2Header::read(reader)? {
            Some(h) => h,
            None => return Ok(None),
        };
        let body = read_vec(reader, header.size as usize)?;
        Self::from_parts(header, body).map(Some)
    }

    /// Parse a tag whose header has already been read
    pub fn from_parts(header: Id3v2Header, mut body: Vec<u8>) -> Result<Self, DecodeError> {
        let major = header.version.0;
        if major != 3 && major != 4 {
            return Err(DecodeError::Unsupported(format!("ID3v2.{}", major)));
        }

        // v2.3 unsynchronises the whole tag; v2.4 flags it per frame
        if major == 3 && header.flags & Id3v2Header::FLAG_UNSYNCHRONISATION != 0 {
            body = remove_unsynchronisation(&body);
        }

        let mut pos = 0;
        if header.flags & Id3v2Header::FLAG_EXTENDED_HEADER != 0 {
            pos = extended_header_len(&body, major)?;
        }

        let mut frames = Vec::new();
        while pos + Id3Frame::HEADER_SIZE <= body.len() {
            let frame_header = &body[pos..pos + Id3Frame::HEADER_SIZE];
            if !is_valid_frame_id(&frame_header[0..4]) {
                // Padding or trailing garbage ends the frame list
                break;
            }

            let size_bytes = [frame_header[4], frame_header[5], frame_header[6], frame_header[7]];
            let size = if major >= 4 {
                synchsafe_u32(size_bytes)
            } else {
                u32::from_be_bytes(size_bytes)
            } as usize;
            let flags = u16::from_be_bytes([frame_header[8], frame_header[9]]);

            let start = pos + Id3Frame::HEADER_SIZE;
            let end = start
                .checked_add(size)
                .filter(|&end| end <= body.len())
                .ok_or_else(|| {
                    DecodeError::Malformed(format!(
                        "frame {} overruns tag body",
                        String::from_utf8_lossy(&frame_header[0..4])
                    ))
                })?;

            let frame_id = String::from_utf8_lossy(&frame_header[0..4]).into_owned();
            let frame = Id3Frame::from_stored(frame_id, flags, &body[start..end], major)?;
            trace!(frame = %frame.frame_id, len = frame.data.len(), "read ID3v2 frame");
            frames.push(frame);
            pos = end;
        }

        Ok(Id3v2Tag { header, frames })
    }
}

impl Id3Frame {
    pub const HEADER_SIZE: usize = 10;

    /// Build a frame from an already-decoded body
    pub fn new(frame_id: impl Into<String>, data: Vec<u8>) -> Self {
        Id3Frame {
            frame_id: frame_id.into(),
            data,
            compressed: false,
            encrypted: false,
        }
    }

    /// Raw frame identifier, e.g. `TIT2`
    pub fn id(&self) -> &str {
        &self.frame_id
    }

    /// Apply the per-frame format flags to a stored body.
    ///
    /// Compressed and encrypted bodies are kept as stored and flagged;
    /// rendering them fails.
    fn from_stored(frame_id: String, flags: u16, stored: &[u8], major: u8) -> Result<Self, DecodeError> {
        let (compressed, encrypted, grouping, unsync, length_indicator) = if major >= 4 {
            (
                flags & 0x0008 != 0,
                flags & 0x0004 != 0,
                flags & 0x0040 != 0,
                flags & 0x0002 != 0,
                flags & 0x0001 != 0,
            )
        } else {
            (flags & 0x0080 != 0, flags & 0x0040 != 0, flags & 0x0020 != 0, false, false)
        };

        // Extra header bytes in v2.3 order: decompressed size, encryption method, group id
        let mut skip = 0;
        if major < 4 && compressed {
            skip += 4;
        }
        if major < 4 && encrypted {
            skip += 1;
        }
        if grouping {
            skip += 1;
        }
        if major >= 4 && encrypted {
            skip += 1;
        }
        if length_indicator {
            skip += 4;
        }
        if skip > stored.len() {
            return Err(DecodeError::Malformed(format!("frame {} shorter than its flags require", frame_id)));
        }

        let body = &stored[skip..];
        let data = if unsync {
            remove_unsynchronisation(body)
        } else {
            body.to_vec()
        };

        Ok(Id3Frame {
            frame_id,
            data,
            compressed,
            encrypted,
        })
    }
}

fn is_valid_frame_id(id: &[u8]) -> bool {
    id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Length of the extended header at the start of `body`
fn extended_header_len(body: &[u8], major: u8) -> Result<usize, DecodeError> {
    if body.len() < 4 {
        return Err(DecodeError::Malformed("truncated extended header".to_string()));
    }
    let size_bytes = [body[0], body[1], body[2], body[3]];
    let len = if major >= 4 {
        // v2.4 counts the size field itself
        synchsafe_u32(size_bytes) as usize
    } else {
        u32::from_be_bytes(size_bytes) as usize + 4
    };
    if len > body.len() {
        return Err(DecodeError::Malformed("extended header overruns tag body".to_string()));
    }
    Ok(len)
}

/// Undo ID3 unsynchronisation (`FF 00` → `FF`)
fn remove_unsynchronisation(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev_ff = false;
    for &b in data {
        if prev_ff && b == 0x00 {
            prev_ff = false;
            continue;
        }
        out.push(b);
        prev_ff = b == 0xFF;
    }
    out
}
