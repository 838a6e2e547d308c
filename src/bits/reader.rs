use crate::error::{Error, Result};

/// Bit-level reader over an in-memory payload
///
/// Reads bits MSB-first, matching [`BitWriter`](super::BitWriter), and never
/// reads past `limit` bits.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Next bit to read
    position: usize,
    /// One past the last readable bit
    limit: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0, limit: data.len() * 8 }
    }

    /// Reader over the first `limit` bits of `data` (clamped to its length)
    pub fn with_limit(data: &'a [u8], limit: usize) -> Self {
        Self { data, position: 0, limit: limit.min(data.len() * 8) }
    }

    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.limit {
            return None;
        }
        let byte = self.data[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    /// Read `n` bits (0-32), most significant first
    pub fn read_bits(&mut self, n: u8) -> Option<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");
        if self.bits_remaining() < n as usize {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Some(value)
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn bits_remaining(&self) -> usize {
        self.limit - self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitReader<'_> {}

/// Strip the padding header and trailing padding from a packed payload,
/// returning a reader over exactly the encoded bits.
pub fn unpack(payload: &[u8]) -> Result<BitReader<'_>> {
    let (&padding, body) = payload
        .split_first()
        .ok_or_else(|| Error::MalformedArtifact("payload is missing its padding header".into()))?;

    let available = body.len() * 8;
    if !(1..=8).contains(&padding) || padding as usize > available {
        return Err(Error::InvalidPadding { padding, available });
    }

    Ok(BitReader::with_limit(body, available - padding as usize))
}
