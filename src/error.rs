use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors not tied to a specific operation stage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Compression side
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read source text {}: {source}", path.display())]
    SourceRead { path: PathBuf, source: std::io::Error },

    #[error("Failed to write artifact {}: {source}", path.display())]
    ArtifactWrite { path: PathBuf, source: std::io::Error },

    // Decompression side
    #[error("Failed to read artifact {}: {source}", path.display())]
    ArtifactRead { path: PathBuf, source: std::io::Error },

    #[error("Failed to write decompressed text {}: {source}", path.display())]
    OutputWrite { path: PathBuf, source: std::io::Error },

    // Artifact structure errors
    #[error("Invalid artifact magic: expected \"HUFZ\", got {0:02x?}")]
    InvalidMagic([u8; 4]),

    #[error("Unsupported artifact version: {0} (only version 1 supported)")]
    UnsupportedVersion(u8),

    #[error("Artifact CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Invalid padding header: {padding} (must be 1-8, with {available} bits available)")]
    InvalidPadding { padding: u8, available: usize },

    #[error("Malformed artifact: {0}")]
    MalformedArtifact(String),

    // Decode walk errors
    #[error("Undecodable bits at offset {bit_offset}: no code matches {residue} bits")]
    DecodeInconsistency { bit_offset: usize, residue: usize },

    #[error("Symbol {0:?} has no code in the table")]
    MissingSymbol(char),
}

/// Coarse classification of an [`Error`], for callers that branch on the
/// failure category rather than the exact cause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    SourceNotFound,
    SourceRead,
    ArtifactWrite,
    ArtifactRead,
    ArtifactMalformed,
    DecodeInconsistency,
    OutputWrite,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::SourceNotFound(_) => ErrorKind::SourceNotFound,
            Error::SourceRead { .. } => ErrorKind::SourceRead,
            Error::ArtifactWrite { .. } => ErrorKind::ArtifactWrite,
            Error::ArtifactRead { .. } => ErrorKind::ArtifactRead,
            Error::OutputWrite { .. } => ErrorKind::OutputWrite,
            Error::InvalidMagic(_)
            | Error::UnsupportedVersion(_)
            | Error::ChecksumMismatch { .. }
            | Error::InvalidPadding { .. }
            | Error::MalformedArtifact(_) => ErrorKind::ArtifactMalformed,
            Error::DecodeInconsistency { .. } | Error::MissingSymbol(_) => {
                ErrorKind::DecodeInconsistency
            }
        }
    }

    /// Whether the artifact bytes themselves are at fault
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::ArtifactMalformed
    }
}

pub type Result<T> = std::result::Result<T, Error>;
