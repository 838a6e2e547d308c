//! Persisted artifact: the reverse code mapping plus the packed payload.
//!
//! Format version 1 (all integers little-endian):
//!
//! ```text
//! "HUFZ" | version u8 | entry count u32
//! entry*: symbol u32 | code length u16 | ceil(len/8) code bytes, MSB first
//! payload length u64 | payload | CRC32 of all preceding bytes
//! ```
//!
//! The payload is `[padding][code bits][padding zero bits]`, see
//! [`BitWriter::pack`](crate::bits::BitWriter::pack).

pub mod constants;
pub mod reader;
pub mod writer;

pub use constants::*;
pub use reader::{parse_artifact, read_artifact};
pub use writer::ArtifactWriter;

use crate::error::Result;
use crate::huffman::CodeTable;

/// Everything needed to reconstruct a text: no frequencies, no tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Artifact {
    pub table: CodeTable,
    pub payload: Vec<u8>,
}

impl Artifact {
    pub fn new(table: CodeTable, payload: Vec<u8>) -> Self {
        Self { table, payload }
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_len_hint());
        ArtifactWriter::new(&mut out).write_artifact(self)?;
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        parse_artifact(data)
    }

    fn serialized_len_hint(&self) -> usize {
        MIN_ARTIFACT_SIZE + self.table.len() * (ENTRY_FIXED_SIZE + 2) + self.payload.len()
    }
}
