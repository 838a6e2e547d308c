use std::io::{self, Write};

use super::constants::*;
use super::Artifact;
use crate::bits::BitWriter;
use crate::error::{Error, Result};

/// Serializes an [`Artifact`] in format version 1, checksumming as it goes
pub struct ArtifactWriter<W: Write> {
    writer: W,
    hasher: crc32fast::Hasher,
    bytes_written: u64,
}

impl<W: Write> ArtifactWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, hasher: crc32fast::Hasher::new(), bytes_written: 0 }
    }

    /// Write the whole artifact including the CRC32 trailer.
    ///
    /// Returns the number of bytes written.
    pub fn write_artifact(mut self, artifact: &Artifact) -> Result<u64> {
        let entries = artifact.table.entries_by_code();
        let entry_count = u32::try_from(entries.len())
            .map_err(|_| invalid_input(format!("too many symbols: {}", entries.len())))?;

        self.put(&ARTIFACT_MAGIC)?;
        self.put(&[FORMAT_VERSION])?;
        self.put(&entry_count.to_le_bytes())?;

        for (code, symbol) in entries {
            let code_len = u16::try_from(code.len())
                .map_err(|_| {
                    invalid_input(format!("code for {:?} is {} bits long", symbol, code.len()))
                })?;

            let mut bits = BitWriter::with_capacity(code.len().div_ceil(8));
            bits.write_code(code);

            self.put(&u32::from(symbol).to_le_bytes())?;
            self.put(&code_len.to_le_bytes())?;
            self.put(&bits.finish())?;
        }

        self.put(&(artifact.payload.len() as u64).to_le_bytes())?;
        self.put(&artifact.payload)?;

        let crc = self.hasher.clone().finalize();
        self.writer.write_all(&crc.to_le_bytes())?;
        self.writer.flush()?;

        Ok(self.bytes_written + ARTIFACT_TRAILER_SIZE as u64)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.hasher.update(bytes);
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

fn invalid_input(message: String) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidInput, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::{CodeTable, FrequencyTable};

    fn artifact_for(text: &str, payload: Vec<u8>) -> Artifact {
        Artifact::new(CodeTable::from_frequencies(&FrequencyTable::from_text(text)), payload)
    }

    #[test]
    fn test_single_symbol_layout() {
        let mut out = Vec::new();
        let written =
            ArtifactWriter::new(&mut out).write_artifact(&artifact_for("x", vec![7, 0])).unwrap();
        assert_eq!(written, out.len() as u64);

        let mut expected = Vec::new();
        expected.extend_from_slice(b"HUFZ");
        expected.push(1);
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&('x' as u32).to_le_bytes());
        expected.extend_from_slice(&1u16.to_le_bytes());
        expected.push(0b0000_0000);
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&[7, 0]);
        let crc = crc32fast::hash(&expected);
        expected.extend_from_slice(&crc.to_le_bytes());

        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_artifact_is_minimal() {
        let mut out = Vec::new();
        let empty = Artifact::new(CodeTable::empty(), Vec::new());
        ArtifactWriter::new(&mut out).write_artifact(&empty).unwrap();
        assert_eq!(out.len(), MIN_ARTIFACT_SIZE);
    }

    #[test]
    fn test_entries_written_in_code_order() {
        let mut out = Vec::new();
        let artifact = artifact_for("aaabbc", vec![7, 0x1F, 0]);
        ArtifactWriter::new(&mut out).write_artifact(&artifact).unwrap();

        // a:"0", then c:"10", then b:"11"
        let entries = &out[ARTIFACT_HEADER_SIZE..];
        assert_eq!(&entries[0..4], &('a' as u32).to_le_bytes());
        assert_eq!(entries[6], 0b0000_0000);
        assert_eq!(&entries[7..11], &('c' as u32).to_le_bytes());
        assert_eq!(entries[13], 0b1000_0000);
        assert_eq!(&entries[14..18], &('b' as u32).to_le_bytes());
        assert_eq!(entries[20], 0b1100_0000);
    }

    #[test]
    fn test_deterministic_output() {
        let artifact = artifact_for("deterministic serialization", vec![1, 0]);
        let mut first = Vec::new();
        let mut second = Vec::new();
        ArtifactWriter::new(&mut first).write_artifact(&artifact).unwrap();
        ArtifactWriter::new(&mut second).write_artifact(&artifact).unwrap();
        assert_eq!(first, second);
    }
}
