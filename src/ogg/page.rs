use std::io::Read;

use crate::error::DecodeError;
use crate::ogg::OGG_SIGNATURE;
use crate::utils::io::read_vec;

/// OGG Page Header
#[derive(Debug, Clone)]
pub struct OggPageHeader {
    pub bitstream_serial: u32,
    pub segment_table: Vec<u8>,
}

/// OGG Page
#[derive(Debug, Clone)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub data: Vec<u8>,
}

impl OggPageHeader {
    const SIZE: usize = 27;

    /// Read OGG page header from a reader; `Ok(None)` at a clean end of stream
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>, DecodeError> {
        let mut header = [0u8; Self::SIZE];
        let read = read_up_to(reader, &mut header)?;
        if read == 0 {
            return Ok(None);
        }
        if read < Self::SIZE {
            return Err(DecodeError::Malformed("truncated Ogg page header".to_string()));
        }

        if &header[0..4] != OGG_SIGNATURE {
            return Err(DecodeError::Malformed("missing OggS capture pattern".to_string()));
        }
        if header[4] != 0 {
            return Err(DecodeError::Unsupported(format!("Ogg stream version {}", header[4])));
        }

        let bitstream_serial = u32::from_le_bytes([header[14], header[15], header[16], header[17]]);
        let segment_count = header[26] as usize;
        let segment_table = read_vec(reader, segment_count)?;

        Ok(Some(OggPageHeader {
            bitstream_serial,
            segment_table,
        }))
    }

    /// Calculate total page data size from segment table
    pub fn data_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }
}

impl OggPage {
    /// Read OGG page from a reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>, DecodeError> {
        let header = match OggPageHeader::read(reader)? {
            Some(header) => header,
            None => return Ok(None),
        };
        let data = read_vec(reader, header.data_size())?;
        Ok(Some(OggPage { header, data }))
    }
}

/// Reassembles packets of the first logical stream from consecutive pages
pub struct PacketReader<R> {
    reader: R,
    serial: Option<u32>,
    partial: Vec<u8>,
    ready: std::collections::VecDeque<Vec<u8>>,
}

impl<R: Read> PacketReader<R> {
    /// Upper bound for a header packet; guards against runaway continuation
    const MAX_PACKET: usize = 16 * 1024 * 1024;

    pub fn new(reader: R) -> Self {
        PacketReader {
            reader,
            serial: None,
            partial: Vec::new(),
            ready: std::collections::VecDeque::new(),
        }
    }

    /// Next complete packet, or `Ok(None)` when the stream ends
    pub fn next_packet(&mut self) -> Result<Option<Vec<u8>>, DecodeError> {
        while self.ready.is_empty() {
            let page = match OggPage::read(&mut self.reader)? {
                Some(page) => page,
                None => return Ok(None),
            };

            // Pages of other multiplexed streams are ignored
            let serial = *self.serial.get_or_insert(page.header.bitstream_serial);
            if page.header.bitstream_serial != serial {
                continue;
            }

            let mut offset = 0;
            for &lacing in &page.header.segment_table {
                let end = offset + lacing as usize;
                self.partial.extend_from_slice(&page.data[offset..end]);
                offset = end;
                // A lacing value below 255 terminates the packet
                if lacing < 255 {
                    self.ready.push_back(std::mem::take(&mut self.partial));
                }
            }

            if self.partial.len() > Self::MAX_PACKET {
                return Err(DecodeError::Malformed("Ogg header packet too large".to_string()));
            }
        }
        Ok(self.ready.pop_front())
    }
}

/// Fill `buf` as far as the reader allows, returning the byte count
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Build a single Ogg page carrying `packets` (test helper)
#[cfg(test)]
pub(crate) fn build_page(serial: u32, sequence: u32, header_type: u8, packets: &[&[u8]]) -> Vec<u8> {
    let mut lacing = Vec::new();
    let mut data = Vec::new();
    for packet in packets {
        let mut remaining = packet.len();
        while remaining >= 255 {
            lacing.push(255u8);
            remaining -= 255;
        }
        lacing.push(remaining as u8);
        data.extend_from_slice(packet);
    }

    let mut page = OGG_SIGNATURE.to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&0u64.to_le_bytes());
    page.extend_from_slice(&serial.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&0u32.to_le_bytes());
    page.push(lacing.len() as u8);
    page.extend_from_slice(&lacing);
    page.extend_from_slice(&data);
    page
}
