//! String section: deduplicated byte strings addressed by `u32` ids.
//!
//! Rule names and literal bytes share one table. The section is a blob of
//! concatenated bytes followed by `count + 1` big-endian offsets, the last
//! of which is the blob size.

use std::collections::HashMap;

use super::error::FormatError;

/// Writer side: interns byte strings in first-use order.
#[derive(Debug, Default)]
pub struct StringTable {
    ids: HashMap<Box<[u8]>, u32>,
    entries: Vec<Box<[u8]>>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, bytes: &[u8]) -> u32 {
        if let Some(&id) = self.ids.get(bytes) {
            return id;
        }
        let id = self.entries.len() as u32;
        self.entries.push(bytes.into());
        self.ids.insert(bytes.into(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the blob and its offset table (with sentinel).
    pub fn to_blob(&self) -> (Vec<u8>, Vec<u32>) {
        let mut blob = Vec::new();
        let mut offsets = Vec::with_capacity(self.entries.len() + 1);
        for entry in &self.entries {
            offsets.push(blob.len() as u32);
            blob.extend_from_slice(entry);
        }
        offsets.push(blob.len() as u32);
        (blob, offsets)
    }
}

/// Reader side: zero-copy view over an encoded string section.
#[derive(Clone, Copy, Debug)]
pub struct StringView<'b> {
    blob: &'b [u8],
    offsets: &'b [u8],
    count: u32,
}

impl<'b> StringView<'b> {
    /// `offsets` must hold exactly `count + 1` entries.
    pub fn new(blob: &'b [u8], offsets: &'b [u8], count: u32) -> Self {
        debug_assert_eq!(offsets.len(), (count as usize + 1) * 4);
        Self {
            blob,
            offsets,
            count,
        }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn offset(&self, index: u32) -> usize {
        let at = index as usize * 4;
        let raw = [
            self.offsets[at],
            self.offsets[at + 1],
            self.offsets[at + 2],
            self.offsets[at + 3],
        ];
        u32::from_be_bytes(raw) as usize
    }

    pub fn get(&self, id: u32) -> Result<&'b [u8], FormatError> {
        if id >= self.count {
            return Err(FormatError::BadStringId(id));
        }
        let start = self.offset(id);
        let end = self.offset(id + 1);
        self.blob
            .get(start..end)
            .ok_or(FormatError::BadStringTable(id))
    }

    pub fn get_str(&self, id: u32) -> Result<&'b str, FormatError> {
        std::str::from_utf8(self.get(id)?).map_err(|_| FormatError::InvalidUtf8(id))
    }
}
