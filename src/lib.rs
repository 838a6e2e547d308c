//! Lossless Huffman text compression.
//!
//! Compression counts symbol frequencies, builds a Huffman tree, assigns
//! prefix-free codes, packs the coded text behind a one-byte padding header
//! and persists `(reverse code table, payload)` as a checksummed artifact.
//! Decompression needs only that artifact.

pub mod bits;
pub mod codec;
pub mod container;
pub mod error;
pub mod huffman;

pub use codec::{compress_to_vec, decompress_from_slice, FileCodec};
pub use container::Artifact;
pub use error::{Error, ErrorKind, Result};
pub use huffman::{Code, CodeTable, FrequencyTable, HuffmanDecoder, HuffmanEncoder, HuffmanTree};

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use log::error;

/// Suffix appended to a source path to name its artifact
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".bin";

/// Suffix that replaces the artifact suffix on decompression
pub const DEFAULT_DECOMPRESSED_SUFFIX: &str = "_decompressed.txt";

/// Configuration for file compression and decompression
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Appended to the source path to form the artifact path (default: ".bin")
    pub artifact_suffix: String,
    /// Replaces `artifact_suffix` to form the decompressed path
    /// (default: "_decompressed.txt")
    pub decompressed_suffix: String,
    /// Threads for frequency counting (0 = auto, 1 = single pass)
    pub num_threads: usize,
    /// Buffer size for file I/O
    pub buffer_size: usize,
}

impl CodecConfig {
    /// Artifact path for a source file: the source path plus the artifact suffix
    pub fn artifact_path(&self, source: &Path) -> PathBuf {
        let mut path = OsString::from(source.as_os_str());
        path.push(&self.artifact_suffix);
        PathBuf::from(path)
    }

    /// Output path for an artifact: the trailing artifact suffix is replaced by
    /// the decompressed suffix, or the decompressed suffix is appended when the
    /// artifact path does not end with it.
    pub fn decompressed_path(&self, artifact: &Path) -> PathBuf {
        let bytes = artifact.as_os_str().as_encoded_bytes();
        let mut path = match bytes.strip_suffix(self.artifact_suffix.as_bytes()) {
            // SAFETY: the split point sits right before a non-empty UTF-8 suffix,
            // or at the end of the original bytes.
            Some(stem) => OsString::from(unsafe { OsStr::from_encoded_bytes_unchecked(stem) }),
            None => OsString::from(artifact.as_os_str()),
        };
        path.push(&self.decompressed_suffix);
        PathBuf::from(path)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            decompressed_suffix: DEFAULT_DECOMPRESSED_SUFFIX.to_string(),
            num_threads: 1,
            buffer_size: 128 * 1024,
        }
    }
}

/// Statistics from a compress or decompress operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    /// Code bits in the payload, excluding header and padding
    pub encoded_bits: u64,
    /// Zero bits appended to reach a byte boundary (1-8)
    pub padding_bits: u8,
}

/// Compress the text file at `path` into `<path>.bin`.
///
/// Returns the artifact path, or `None` after logging the error.
pub fn compress(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    match FileCodec::default().compress_file(path) {
        Ok((output, _)) => Some(output),
        Err(e) => {
            error!("Compression of {} failed: {}", path.display(), e);
            None
        }
    }
}

/// Decompress the artifact at `path` into `<stem>_decompressed.txt`.
///
/// Returns the text path, or `None` after logging the error.
pub fn decompress(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    match FileCodec::default().decompress_file(path) {
        Ok((output, _)) => Some(output),
        Err(e) => {
            error!("Decompression of {} failed: {}", path.display(), e);
            None
        }
    }
}
