// Byte-level readers shared by the container parsers

use std::io::{self, Read};

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

/// Read exactly `len` bytes into a fresh buffer.
///
/// The length comes from untrusted headers, so the read is bounded by what
/// the reader actually yields instead of pre-allocating `len` bytes.
pub fn read_vec<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    let read = reader.take(len as u64).read_to_end(&mut data)?;
    if read != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, read),
        ));
    }
    Ok(data)
}

/// Decode a synchsafe 32-bit integer (7 bits per byte)
pub fn synchsafe_u32(bytes: [u8; 4]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_synchsafe() {
        assert_eq!(synchsafe_u32([0, 0, 0x02, 0x01]), 257);
        assert_eq!(synchsafe_u32([0x7F, 0x7F, 0x7F, 0x7F]), 0x0FFF_FFFF);
    }

    #[test]
    fn test_read_vec_short_input() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let err = read_vec(&mut cursor, 8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_le_u32() {
        let mut cursor = Cursor::new(vec![1, 0, 0, 0, 0, 1]);
        assert_eq!(read_le_u32(&mut cursor).unwrap(), 1);
        assert!(read_le_u32(&mut cursor).is_err());
    }
}
