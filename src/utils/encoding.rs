// Text encoding helpers shared by the ID3 frame renderer

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// ID3v2 text encodings, keyed by the leading byte of a text frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    /// Returns `None` for encoding bytes outside the ID3v2.4 range
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Iso8859_1),
            1 => Some(TextEncoding::Utf16),
            2 => Some(TextEncoding::Utf16BE),
            3 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    /// Width of the string terminator in this encoding
    pub fn terminator_len(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
            TextEncoding::Iso8859_1 | TextEncoding::Utf8 => 1,
        }
    }
}

/// Decode text with specified encoding
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Iso8859_1 => WINDOWS_1252.decode(data).0.into_owned(),
        TextEncoding::Utf16 => {
            // BOM picks the byte order; little-endian when absent
            if data.len() >= 2 && data[0..2] == [0xFF, 0xFE] {
                UTF_16LE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else if data.len() >= 2 && data[0..2] == [0xFE, 0xFF] {
                UTF_16BE.decode_without_bom_handling(&data[2..]).0.into_owned()
            } else {
                UTF_16LE.decode_without_bom_handling(data).0.into_owned()
            }
        }
        TextEncoding::Utf16BE => UTF_16BE.decode_without_bom_handling(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
    }
}

/// Split `data` at the first terminator for `encoding`.
///
/// Returns the bytes before the terminator and the bytes after it. UTF-16
/// terminators are only recognised on even offsets. When no terminator is
/// present the whole slice is returned as the head and `None` as the rest.
pub fn split_terminated(data: &[u8], encoding: TextEncoding) -> (&[u8], Option<&[u8]>) {
    match encoding.terminator_len() {
        2 => {
            let mut i = 0;
            while i + 1 < data.len() {
                if data[i] == 0 && data[i + 1] == 0 {
                    return (&data[..i], Some(&data[i + 2..]));
                }
                i += 2;
            }
            (data, None)
        }
        _ => match data.iter().position(|&b| b == 0) {
            Some(i) => (&data[..i], Some(&data[i + 1..])),
            None => (data, None),
        },
    }
}

/// Decode a run of terminator-separated strings, dropping trailing empties
pub fn decode_text_list(data: &[u8], encoding: TextEncoding) -> Vec<String> {
    let mut values = Vec::new();
    let mut rest = Some(data);

    while let Some(chunk) = rest {
        if chunk.is_empty() {
            break;
        }
        let (head, tail) = split_terminated(chunk, encoding);
        values.push(decode_text(head, encoding));
        rest = tail;
    }

    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_text(b"Caf\xe9", TextEncoding::Iso8859_1), "Café");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let le = [0xFF, 0xFE, b'h', 0, b'i', 0];
        let be = [0xFE, 0xFF, 0, b'h', 0, b'i'];
        assert_eq!(decode_text(&le, TextEncoding::Utf16), "hi");
        assert_eq!(decode_text(&be, TextEncoding::Utf16), "hi");
    }

    #[test]
    fn test_unknown_encoding_byte() {
        assert_eq!(TextEncoding::from_byte(3), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_byte(7), None);
    }

    #[test]
    fn test_split_utf16_respects_alignment() {
        // 0x00 0x00 straddling code units must not split
        let data = [b'a', 0, 0, b'b', 0, 0, b'c', 0];
        let (head, rest) = split_terminated(&data, TextEncoding::Utf16BE);
        assert_eq!(head, &[b'a', 0, 0, b'b']);
        assert_eq!(rest, Some(&[b'c', 0][..]));
    }

    #[test]
    fn test_decode_text_list() {
        let values = decode_text_list(b"Rock\0Indie\0", TextEncoding::Utf8);
        assert_eq!(values, vec!["Rock", "Indie"]);
        assert!(decode_text_list(b"", TextEncoding::Utf8).is_empty());
    }
}
