/// Magic bytes identifying a rekog grammar file.
pub const MAGIC: [u8; 4] = *b"RKOG";

/// Current format version.
pub const VERSION: u32 = 1;

/// Size of the fixed file header.
pub const HEADER_SIZE: usize = 64;

/// Encoded `max` of an unbounded repetition.
pub const UNBOUNDED: u32 = u32::MAX;

/// Maximum node nesting accepted by the reader.
pub const MAX_DEPTH: usize = 1024;

/// Literal flag: ASCII letters compare case-insensitively.
pub const FLAG_CASE_INSENSITIVE: u8 = 1;
