use log::debug;

use super::codes::CodeTable;
use super::frequency::FrequencyTable;
use crate::bits::{padding_for, BitWriter};
use crate::container::Artifact;
use crate::error::{Error, Result};

/// Output of [`HuffmanEncoder::encode`]
#[derive(Clone, Debug)]
pub struct EncodedText {
    pub artifact: Artifact,
    /// Code bits before padding
    pub encoded_bits: usize,
    /// Zero bits appended after the code bits (1-8)
    pub padding: u8,
}

/// Builds a code table for a text and packs the text with it
pub struct HuffmanEncoder {
    /// Threads for frequency counting (0 = one per CPU, 1 = single pass)
    num_threads: usize,
}

impl HuffmanEncoder {
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }

    fn effective_threads(&self) -> usize {
        match self.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n,
        }
    }

    /// Count symbol frequencies, in parallel when configured
    pub fn count(&self, text: &str) -> FrequencyTable {
        match self.effective_threads() {
            1 => FrequencyTable::from_text(text),
            n => FrequencyTable::from_text_parallel(text, n),
        }
    }

    /// Compress `text` into an artifact
    pub fn encode(&self, text: &str) -> Result<EncodedText> {
        let frequencies = self.count(text);
        let table = CodeTable::from_frequencies(&frequencies);
        debug!(
            "Built code table: {} distinct symbols, longest code {} bits",
            table.len(),
            table.max_code_len()
        );

        let capacity = table.encoded_bit_len(&frequencies).unwrap_or(0) as usize / 8 + 1;
        let mut writer = BitWriter::with_capacity(capacity);
        for symbol in text.chars() {
            let code = table.code(symbol).ok_or(Error::MissingSymbol(symbol))?;
            writer.write_code(code);
        }

        let encoded_bits = writer.bit_len();
        let padding = padding_for(encoded_bits);
        let payload = writer.pack();
        debug!(
            "Encoded {} bits, {} padding bits, {} payload bytes",
            encoded_bits,
            padding,
            payload.len()
        );

        Ok(EncodedText { artifact: Artifact::new(table, payload), encoded_bits, padding })
    }
}

impl Default for HuffmanEncoder {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_aaabbc() {
        // a:"0" c:"10" b:"11" -> 0 0 0 11 11 10
        let encoded = HuffmanEncoder::default().encode("aaabbc").unwrap();
        assert_eq!(encoded.encoded_bits, 9);
        assert_eq!(encoded.padding, 7);
        assert_eq!(encoded.artifact.payload, vec![7, 0b0001_1111, 0b0000_0000]);
    }

    #[test]
    fn test_encode_single_char() {
        let encoded = HuffmanEncoder::default().encode("x").unwrap();
        assert_eq!(encoded.encoded_bits, 1);
        assert_eq!(encoded.artifact.payload, vec![7, 0]);
        assert_eq!(encoded.artifact.table.code('x').map(|c| c.to_string()), Some("0".into()));
    }

    #[test]
    fn test_encode_two_symbols() {
        let encoded = HuffmanEncoder::default().encode("ab").unwrap();
        assert_eq!(encoded.artifact.payload, vec![6, 0b0100_0000]);
    }

    #[test]
    fn test_encode_aligned_gets_full_padding_byte() {
        let encoded = HuffmanEncoder::default().encode("aaaabbbb").unwrap();
        assert_eq!(encoded.encoded_bits, 8);
        assert_eq!(encoded.padding, 8);
        assert_eq!(encoded.artifact.payload, vec![8, 0x0F, 0x00]);
    }

    #[test]
    fn test_encode_empty() {
        let encoded = HuffmanEncoder::default().encode("").unwrap();
        assert!(encoded.artifact.table.is_empty());
        assert_eq!(encoded.encoded_bits, 0);
        assert_eq!(encoded.artifact.payload, vec![8, 0]);
    }

    #[test]
    fn test_parallel_count_gives_same_artifact() {
        let text = "Parallel counting must not change the code table. ".repeat(50);
        let single = HuffmanEncoder::new(1).encode(&text).unwrap();
        let multi = HuffmanEncoder::new(4).encode(&text).unwrap();
        assert_eq!(single.artifact, multi.artifact);
    }

    #[test]
    fn test_payload_is_byte_aligned() {
        for text in ["a", "ab", "abc", "hello, world", "ααααββγ"] {
            let encoded = HuffmanEncoder::default().encode(text).unwrap();
            let payload = &encoded.artifact.payload;
            assert!((1..=8).contains(&payload[0]));
            assert_eq!(8 + encoded.encoded_bits + encoded.padding as usize, payload.len() * 8);
        }
    }
}
