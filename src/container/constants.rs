/// Artifact magic bytes
pub const ARTIFACT_MAGIC: [u8; 4] = *b"HUFZ";

/// Current (and only) artifact format version
pub const FORMAT_VERSION: u8 = 1;

/// Magic + version + entry count
pub const ARTIFACT_HEADER_SIZE: usize = 9;

/// Per-entry fixed part: symbol (u32) + code length (u16)
pub const ENTRY_FIXED_SIZE: usize = 6;

/// Payload length field (u64)
pub const PAYLOAD_LEN_SIZE: usize = 8;

/// CRC32 trailer
pub const ARTIFACT_TRAILER_SIZE: usize = 4;

/// Smallest well-formed artifact: no entries, empty payload
pub const MIN_ARTIFACT_SIZE: usize =
    ARTIFACT_HEADER_SIZE + PAYLOAD_LEN_SIZE + ARTIFACT_TRAILER_SIZE;
