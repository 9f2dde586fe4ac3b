use std::io;

use super::constants::{HEADER_SIZE, MAX_DEPTH, VERSION};

/// Errors raised while saving or loading a binary grammar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed grammar file: {0}")]
    Format(#[from] FormatError),

    #[error("unsupported grammar format version {found} (expected {VERSION})")]
    Version { found: u32 },

    #[error("grammar `{grammar}` has undefined rules: {}", .rules.join(", "))]
    Incomplete { grammar: String, rules: Vec<String> },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    pub fn is_version_error(&self) -> bool {
        matches!(self, Error::Version { .. })
    }
}

/// Structural corruption of a grammar file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid magic: expected RKOG")]
    InvalidMagic,

    #[error("file too small: {0} bytes (minimum {HEADER_SIZE})")]
    FileTooSmall(usize),

    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },

    #[error("checksum mismatch: header says {expected:08x}, content hashes to {actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("unexpected end of data at offset {0}")]
    Truncated(usize),

    #[error("unknown node tag {tag} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("string id {0} out of range")]
    BadStringId(u32),

    #[error("corrupt string table entry {0}")]
    BadStringTable(u32),

    #[error("string {0} is not valid UTF-8")]
    InvalidUtf8(u32),

    #[error("rule `{0}` is defined twice")]
    DuplicateRule(String),

    #[error("rule record `{found}` found where `{expected}` was indexed")]
    RecordOutOfOrder { expected: String, found: String },

    #[error("nodes nested deeper than {MAX_DEPTH} levels")]
    NestingTooDeep,

    #[error("header declares {header} nodes, records contain {actual}")]
    NodeCountMismatch { header: u32, actual: u32 },

    #[error("{0} trailing bytes after the last rule")]
    TrailingBytes(usize),

    #[error("references to undefined rules: {}", .0.join(", "))]
    UnresolvedRules(Vec<String>),
}
