//! Grammar file header (64 bytes, big-endian).
//!
//! Layout:
//! - 0-3: magic `RKOG`
//! - 4-35: eight `u32` fields (version, checksum, sizes and counts)
//! - 36-63: reserved, zero

use super::constants::{HEADER_SIZE, MAGIC, VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    /// Total file size in bytes.
    pub total_size: u32,
    pub str_blob_size: u32,
    pub str_count: u32,
    pub rule_count: u32,
    pub node_count: u32,
    /// String id of the grammar name.
    pub name: u32,
    pub _reserved: [u8; 28],
}

const _: () = assert!(4 + 8 * 4 + 28 == HEADER_SIZE);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            str_blob_size: 0,
            str_count: 0,
            rule_count: 0,
            node_count: 0,
            name: 0,
            _reserved: [0; 28],
        }
    }
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl Header {
    /// Decode a header from the first 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_SIZE, "header too short");

        let mut reserved = [0u8; 28];
        reserved.copy_from_slice(&bytes[36..64]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: be_u32(bytes, 4),
            checksum: be_u32(bytes, 8),
            total_size: be_u32(bytes, 12),
            str_blob_size: be_u32(bytes, 16),
            str_count: be_u32(bytes, 20),
            rule_count: be_u32(bytes, 24),
            node_count: be_u32(bytes, 28),
            name: be_u32(bytes, 32),
            _reserved: reserved,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_be_bytes());
        bytes[16..20].copy_from_slice(&self.str_blob_size.to_be_bytes());
        bytes[20..24].copy_from_slice(&self.str_count.to_be_bytes());
        bytes[24..28].copy_from_slice(&self.rule_count.to_be_bytes());
        bytes[28..32].copy_from_slice(&self.node_count.to_be_bytes());
        bytes[32..36].copy_from_slice(&self.name.to_be_bytes());
        bytes[36..64].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }

    /// Offset of the string blob.
    pub fn str_blob_offset(&self) -> usize {
        HEADER_SIZE
    }

    /// Offset of the string offset table (`str_count + 1` entries).
    pub fn str_table_offset(&self) -> usize {
        HEADER_SIZE + self.str_blob_size as usize
    }

    /// Offset of the rule index (`rule_count` name ids).
    pub fn rule_index_offset(&self) -> usize {
        self.str_table_offset() + (self.str_count as usize + 1) * 4
    }

    /// Offset of the first rule record.
    pub fn records_offset(&self) -> usize {
        self.rule_index_offset() + self.rule_count as usize * 4
    }
}
