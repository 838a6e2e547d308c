use crate::huffman::Code;

/// Number of zero bits appended after `bit_len` encoded bits.
///
/// Always in 1..=8: an already byte-aligned stream still receives a full
/// byte of padding.
#[inline]
pub fn padding_for(bit_len: usize) -> u8 {
    8 - (bit_len % 8) as u8
}

/// Bit-level writer for Huffman payloads
///
/// Writes bits MSB-first: the first bit written lands in bit 7 of the first
/// byte.
pub struct BitWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
    /// Total bits written
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0, bit_len: 0 }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.current_byte |= (bit as u8) << (7 - self.bits_in_byte);
        self.bits_in_byte += 1;
        self.bit_len += 1;

        if self.bits_in_byte == 8 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Write the low `n` bits (0-32) of `value`, most significant first
    pub fn write_bits(&mut self, value: u32, n: u8) {
        debug_assert!(n <= 32);
        for shift in (0..n).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }
    }

    /// Write every bit of a Huffman code in order
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Finish, zero-filling the last partial byte
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
        }
        self.output
    }

    /// Finish as a padded payload: `[padding][bits][padding zero bits]`.
    ///
    /// The result is always byte-aligned and at least two bytes long.
    pub fn pack(self) -> Vec<u8> {
        let padding = padding_for(self.bit_len);
        let body = self.finish();

        let mut packed = Vec::with_capacity(body.len() + 2);
        packed.push(padding);
        packed.extend_from_slice(&body);
        if padding == 8 {
            // Aligned stream: the padding is a whole extra zero byte
            packed.push(0);
        }
        packed
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
