// ID3v2 frame rendering
//
// Every frame is reduced to a single display string. Text frames join their
// values with "; ", user-defined frames prefix the description in square
// brackets, and frames with no textual form fall back to base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::DecodeError;
use crate::id3::v2::Id3Frame;
use crate::utils::encoding::{decode_text, decode_text_list, split_terminated, TextEncoding};

/// Frame identifiers with special handling
pub mod frame_ids {
    pub const USER_TEXT: &str = "TXXX";
    pub const USER_URL: &str = "WXXX";
    pub const COMMENT: &str = "COMM";
    pub const LYRICS: &str = "USLT";
    pub const PICTURE: &str = "APIC";
}

/// Separator between multiple values of one text frame
pub const VALUE_SEPARATOR: &str = "; ";

impl Id3Frame {
    /// Text frame with UTF-8 encoding
    #[cfg(test)]
    pub(crate) fn text(frame_id: &str, value: &str) -> Self {
        Id3Frame::new(frame_id, encode_text_frame(value, TextEncoding::Utf8))
    }

    /// `TXXX` frame with a description and a value
    #[cfg(test)]
    pub(crate) fn user_text(description: &str, value: &str) -> Self {
        let mut data = encode_text_frame(description, TextEncoding::Utf8);
        data.push(0);
        data.extend_from_slice(value.as_bytes());
        Id3Frame::new(frame_ids::USER_TEXT, data)
    }

    /// Render the frame to its display string.
    ///
    /// Fails on compressed or encrypted frames, unknown text encodings and
    /// structured frames too short for their fixed fields.
    pub fn render(&self) -> Result<String, DecodeError> {
        let id = self.frame_id.as_str();
        // No zlib inflater here: a compressed frame fails its whole file
        if self.compressed {
            return Err(DecodeError::render(id, "compressed frames are not supported"));
        }
        if self.encrypted {
            return Err(DecodeError::render(id, "encrypted frames are not supported"));
        }
        if self.data.is_empty() {
            return Ok(String::new());
        }

        match id {
            frame_ids::USER_TEXT => {
                let (encoding, rest) = self.split_encoding()?;
                let (description, value) = split_terminated(rest, encoding);
                let values = value
                    .map(|v| decode_text_list(v, encoding))
                    .unwrap_or_default();
                Ok(format!(
                    "[{}] {}",
                    decode_text(description, encoding),
                    values.join(VALUE_SEPARATOR)
                ))
            }
            frame_ids::USER_URL => {
                let (encoding, rest) = self.split_encoding()?;
                let (description, url) = split_terminated(rest, encoding);
                let url = url.map(latin1_until_nul).unwrap_or_default();
                Ok(format!("[{}] {}", decode_text(description, encoding), url))
            }
            frame_ids::COMMENT | frame_ids::LYRICS => {
                let (encoding, rest) = self.split_encoding()?;
                if rest.len() < 3 {
                    return Err(DecodeError::render(id, "missing language code"));
                }
                let (_description, text) = split_terminated(&rest[3..], encoding);
                let text = text.map(|t| decode_text_list(t, encoding)).unwrap_or_default();
                Ok(text.join(VALUE_SEPARATOR))
            }
            frame_ids::PICTURE => self.render_picture(),
            _ if id.starts_with('T') => {
                let (encoding, rest) = self.split_encoding()?;
                Ok(decode_text_list(rest, encoding).join(VALUE_SEPARATOR))
            }
            _ if id.starts_with('W') => Ok(latin1_until_nul(&self.data)),
            _ => Ok(STANDARD.encode(&self.data)),
        }
    }

    fn split_encoding(&self) -> Result<(TextEncoding, &[u8]), DecodeError> {
        let encoding = TextEncoding::from_byte(self.data[0]).ok_or_else(|| {
            DecodeError::render(&self.frame_id, format!("unknown text encoding {}", self.data[0]))
        })?;
        Ok((encoding, &self.data[1..]))
    }

    fn render_picture(&self) -> Result<String, DecodeError> {
        let (encoding, rest) = self.split_encoding()?;
        let (mime, after_mime) = split_terminated(rest, TextEncoding::Iso8859_1);
        let after_mime =
            after_mime.ok_or_else(|| DecodeError::render(&self.frame_id, "unterminated MIME type"))?;
        // Skip the picture type byte
        let description = match after_mime.split_first() {
            Some((_, tail)) => decode_text(split_terminated(tail, encoding).0, encoding),
            None => return Err(DecodeError::render(&self.frame_id, "missing picture type")),
        };
        let mime = decode_text(mime, TextEncoding::Iso8859_1);

        if description.is_empty() {
            Ok(format!("[{}]", mime))
        } else {
            Ok(format!("{} [{}]", description, mime))
        }
    }
}

/// Encode text frame data
#[cfg(test)]
pub(crate) fn encode_text_frame(text: &str, encoding: TextEncoding) -> Vec<u8> {
    use encoding_rs::WINDOWS_1252;

    let mut result = vec![encoding as u8];
    match encoding {
        TextEncoding::Iso8859_1 => result.extend_from_slice(&WINDOWS_1252.encode(text).0),
        TextEncoding::Utf16 => {
            // encoding_rs never encodes to UTF-16
            result.extend_from_slice(&[0xFF, 0xFE]);
            for unit in text.encode_utf16() {
                result.extend_from_slice(&unit.to_le_bytes());
            }
        }
        TextEncoding::Utf16BE => {
            for unit in text.encode_utf16() {
                result.extend_from_slice(&unit.to_be_bytes());
            }
        }
        TextEncoding::Utf8 => result.extend_from_slice(text.as_bytes()),
    }
    result
}

fn latin1_until_nul(data: &[u8]) -> String {
    decode_text(split_terminated(data, TextEncoding::Iso8859_1).0, TextEncoding::Iso8859_1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_frame() {
        assert_eq!(Id3Frame::text("TIT2", "Song A").render().unwrap(), "Song A");
    }

    #[test]
    fn test_render_multi_value_text_frame() {
        let frame = Id3Frame::new("TCON", b"\x00Rock\x00Indie\x00".to_vec());
        assert_eq!(frame.render().unwrap(), "Rock; Indie");
    }

    #[test]
    fn test_render_utf16_text_frame() {
        let frame = Id3Frame::new("TPE1", encode_text_frame("Björk", TextEncoding::Utf16));
        assert_eq!(frame.render().unwrap(), "Björk");
        let frame = Id3Frame::new("TPE1", encode_text_frame("Björk", TextEncoding::Utf16BE));
        assert_eq!(frame.render().unwrap(), "Björk");
    }

    #[test]
    fn test_render_user_text() {
        let frame = Id3Frame::user_text("Mood", "Happy");
        assert_eq!(frame.render().unwrap(), "[Mood] Happy");
    }

    #[test]
    fn test_render_user_url() {
        let frame = Id3Frame::new("WXXX", b"\x00Home\x00https://example.org".to_vec());
        assert_eq!(frame.render().unwrap(), "[Home] https://example.org");
    }

    #[test]
    fn test_render_comment() {
        let frame = Id3Frame::new("COMM", b"\x00engdesc\x00Nice track".to_vec());
        assert_eq!(frame.render().unwrap(), "Nice track");

        let short = Id3Frame::new("COMM", b"\x00en".to_vec());
        assert!(matches!(short.render(), Err(DecodeError::FrameRender { .. })));
    }

    #[test]
    fn test_render_picture() {
        let mut data = b"\x00image/jpeg\x00\x03Front\x00".to_vec();
        data.extend_from_slice(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(Id3Frame::new("APIC", data).render().unwrap(), "Front [image/jpeg]");

        let bare = Id3Frame::new("APIC", b"\x00image/png\x00\x03\x00\x89PNG".to_vec());
        assert_eq!(bare.render().unwrap(), "[image/png]");

        let broken = Id3Frame::new("APIC", b"\x00image/png".to_vec());
        assert!(broken.render().is_err());
    }

    #[test]
    fn test_render_binary_frame_as_base64() {
        let frame = Id3Frame::new("MCDI", vec![0x01, 0x02, 0x03]);
        assert_eq!(frame.render().unwrap(), "AQID");
    }

    #[test]
    fn test_render_failures() {
        let bad_encoding = Id3Frame::new("TIT2", b"\x09Song".to_vec());
        assert!(bad_encoding.render().is_err());

        let mut compressed = Id3Frame::text("TIT2", "Song");
        compressed.compressed = true;
        assert!(compressed.render().is_err());
    }

    #[test]
    fn test_render_empty_frame() {
        assert_eq!(Id3Frame::new("TIT2", Vec::new()).render().unwrap(), "");
    }
}
