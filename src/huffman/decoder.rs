use log::debug;

use super::codes::{Code, CodeTable};
use crate::bits::unpack;
use crate::container::Artifact;
use crate::error::{Error, Result};

/// Greedy prefix-code decoder driven only by the reverse mapping
pub struct HuffmanDecoder<'a> {
    table: &'a CodeTable,
}

impl<'a> HuffmanDecoder<'a> {
    pub fn new(table: &'a CodeTable) -> Self {
        Self { table }
    }

    /// Decode an artifact's payload with its own table
    pub fn decode_artifact(artifact: &Artifact) -> Result<String> {
        HuffmanDecoder::new(&artifact.table).decode(&artifact.payload)
    }

    /// Decode a packed payload (`[padding][bits][padding zero bits]`).
    ///
    /// Bits are accumulated one at a time until they form a code in the
    /// table. An accumulated code longer than any table entry, or bits left
    /// over at the end, is a [`Error::DecodeInconsistency`].
    pub fn decode(&self, payload: &[u8]) -> Result<String> {
        let bits = unpack(payload)?;
        let total_bits = bits.bits_remaining();
        let max_len = self.table.max_code_len();

        let mut text = String::with_capacity(total_bits / max_len.max(1));
        let mut current = Code::new();

        for (offset, bit) in bits.enumerate() {
            current.push(bit);
            if let Some(symbol) = self.table.symbol(&current) {
                text.push(symbol);
                current.clear();
            } else if current.len() >= max_len {
                return Err(Error::DecodeInconsistency {
                    bit_offset: offset + 1 - current.len(),
                    residue: current.len(),
                });
            }
        }

        if !current.is_empty() {
            return Err(Error::DecodeInconsistency {
                bit_offset: total_bits - current.len(),
                residue: current.len(),
            });
        }

        debug!("Decoded {} bits into {} symbols", total_bits, text.chars().count());
        Ok(text)
    }
}
