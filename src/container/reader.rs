use std::collections::HashMap;
use std::io::Read;

use super::constants::*;
use super::Artifact;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::{Code, CodeTable};

/// Read a complete artifact from `reader`
pub fn read_artifact<R: Read>(mut reader: R) -> Result<Artifact> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_artifact(&data)
}

/// Parse and validate a format version 1 artifact.
///
/// The checksum is verified before any entry is decoded, so corruption is
/// reported as [`Error::ChecksumMismatch`] rather than a structural error
/// further in.
pub fn parse_artifact(data: &[u8]) -> Result<Artifact> {
    if data.len() < ARTIFACT_HEADER_SIZE {
        return Err(Error::MalformedArtifact(format!(
            "artifact is {} bytes, shorter than its {}-byte header",
            data.len(),
            ARTIFACT_HEADER_SIZE
        )));
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&data[..4]);
    if magic != ARTIFACT_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }
    if data[4] != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(data[4]));
    }
    if data.len() < MIN_ARTIFACT_SIZE {
        return Err(Error::MalformedArtifact(format!(
            "artifact is {} bytes, minimum is {}",
            data.len(),
            MIN_ARTIFACT_SIZE
        )));
    }

    let (body, trailer) = data.split_at(data.len() - ARTIFACT_TRAILER_SIZE);
    let expected = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let found = crc32fast::hash(body);
    if expected != found {
        return Err(Error::ChecksumMismatch { expected, found });
    }

    let mut cursor = ByteCursor::new(body);
    cursor.skip(5)?;

    let entry_count = cursor.read_u32()? as usize;
    // Each entry takes at least 7 bytes; reject counts the body cannot hold
    if entry_count > cursor.remaining() / (ENTRY_FIXED_SIZE + 1) {
        return Err(Error::MalformedArtifact(format!(
            "entry count {} exceeds artifact size",
            entry_count
        )));
    }

    let mut reverse = HashMap::with_capacity(entry_count);
    for _ in 0..entry_count {
        let raw_symbol = cursor.read_u32()?;
        let symbol = char::from_u32(raw_symbol).ok_or_else(|| {
            Error::MalformedArtifact(format!("invalid symbol scalar value 0x{:x}", raw_symbol))
        })?;

        let code_len = cursor.read_u16()? as usize;
        if code_len == 0 {
            return Err(Error::MalformedArtifact(format!("empty code for symbol {:?}", symbol)));
        }

        let code_bytes = cursor.take(code_len.div_ceil(8))?;
        let filler = code_bytes.len() * 8 - code_len;
        if let Some(&last) = code_bytes.last() {
            if filler > 0 && last & ((1u8 << filler) - 1) != 0 {
                return Err(Error::MalformedArtifact(format!(
                    "non-zero filler bits in code for symbol {:?}",
                    symbol
                )));
            }
        }
        let code = Code::from_bits(BitReader::with_limit(code_bytes, code_len).collect());

        if let Some(previous) = reverse.insert(code, symbol) {
            return Err(Error::MalformedArtifact(format!(
                "code assigned to both {:?} and {:?}",
                previous, symbol
            )));
        }
    }
    let table = CodeTable::from_reverse(reverse)?;

    let payload_len = usize::try_from(cursor.read_u64()?)
        .map_err(|_| Error::MalformedArtifact("payload length overflows address space".into()))?;
    let payload = cursor.take(payload_len)?.to_vec();

    if cursor.remaining() != 0 {
        return Err(Error::MalformedArtifact(format!(
            "{} unexpected bytes after payload",
            cursor.remaining()
        )));
    }

    Ok(Artifact::new(table, payload))
}

/// Bounds-checked little-endian reads over a byte slice
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::MalformedArtifact(format!(
                "truncated at offset {}: need {} bytes, {} left",
                self.pos,
                n,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }
}
