// Vorbis comment block, shared by FLAC and Ogg streams

use std::io::Read;

use crate::error::DecodeError;
use crate::utils::io::{read_le_u32, read_vec};

/// Vorbis comment structure
///
/// Fields are kept in stored order; a field name may repeat.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_string: String,
    pub comments: Vec<(String, String)>,
}

impl VorbisComment {
    /// Read Vorbis comment from reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let vendor_length = read_le_u32(reader)? as usize;
        let vendor_string = String::from_utf8_lossy(&read_vec(reader, vendor_length)?).into_owned();

        let comment_count = read_le_u32(reader)? as usize;
        let mut comments = Vec::new();
        for _ in 0..comment_count {
            let comment_length = read_le_u32(reader)? as usize;
            let comment_bytes = read_vec(reader, comment_length)?;
            let comment_string = String::from_utf8_lossy(&comment_bytes);

            // Entries without '=' carry no field name and are ignored
            if let Some((field, value)) = comment_string.split_once('=') {
                comments.push((field.to_string(), value.to_string()));
            }
        }

        Ok(VorbisComment {
            vendor_string,
            comments,
        })
    }

    /// Build a comment block from `(field, value)` pairs
    #[cfg(test)]
    pub(crate) fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        VorbisComment {
            vendor_string: String::new(),
            comments: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Serialize to the on-disk layout (without framing bits)
    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.vendor_string.len() as u32).to_le_bytes());
        out.extend_from_slice(self.vendor_string.as_bytes());
        out.extend_from_slice(&(self.comments.len() as u32).to_le_bytes());
        for (field, value) in &self.comments {
            let entry = format!("{}={}", field, value);
            out.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            out.extend_from_slice(entry.as_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_preserves_order_and_duplicates() {
        let comment = VorbisComment {
            vendor_string: "reference libFLAC 1.4.3".to_string(),
            comments: vec![
                ("GENRE".to_string(), "Rock".to_string()),
                ("TITLE".to_string(), "Song".to_string()),
                ("genre".to_string(), "Indie".to_string()),
            ],
        };

        let parsed = VorbisComment::read(&mut Cursor::new(comment.to_bytes())).unwrap();
        assert_eq!(parsed, comment);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let comment = VorbisComment::from_fields([("NOTE", "a=b")]);
        let parsed = VorbisComment::read(&mut Cursor::new(comment.to_bytes())).unwrap();
        assert_eq!(parsed.comments[0], ("NOTE".to_string(), "a=b".to_string()));
    }

    #[test]
    fn test_truncated_block_is_error() {
        let mut bytes = VorbisComment::from_fields([("TITLE", "Song")]).to_bytes();
        bytes.truncate(bytes.len() - 2);
        assert!(VorbisComment::read(&mut Cursor::new(bytes)).is_err());
    }
}
