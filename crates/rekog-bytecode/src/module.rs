//! Bytes → grammar.
//!
//! [`Module`] validates the header and checksum up front; [`Module::decode`]
//! then rebuilds a fresh [`Grammar`]. Nothing outside the returned value is
//! touched, so a failed load never leaves a half-populated grammar behind.

use std::path::Path;

use rekog_core::{Grammar, NodeId, Recognizer};

use super::constants::{FLAG_CASE_INSENSITIVE, HEADER_SIZE, MAX_DEPTH, UNBOUNDED};
use super::error::{Error, FormatError};
use super::header::Header;
use super::strings::StringView;
use super::tag::Tag;

/// A validated, not yet decoded grammar file.
#[derive(Debug)]
pub struct Module<'b> {
    header: Header,
    bytes: &'b [u8],
}

impl<'b> Module<'b> {
    pub fn from_bytes(bytes: &'b [u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::FileTooSmall(bytes.len()).into());
        }

        let header = Header::from_bytes(bytes);
        if !header.validate_magic() {
            return Err(FormatError::InvalidMagic.into());
        }
        if !header.validate_version() {
            return Err(Error::Version {
                found: header.version,
            });
        }
        if header.total_size as usize != bytes.len() {
            return Err(FormatError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            }
            .into());
        }

        let actual = crc32fast::hash(&bytes[HEADER_SIZE..]);
        if actual != header.checksum {
            return Err(FormatError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            }
            .into());
        }

        // Sections must fit before any of them is sliced.
        let records = (header.str_blob_size as u64)
            + (header.str_count as u64 + 1) * 4
            + header.rule_count as u64 * 4
            + HEADER_SIZE as u64;
        if records > bytes.len() as u64 {
            return Err(FormatError::Truncated(bytes.len()).into());
        }

        Ok(Self { header, bytes })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn strings(&self) -> StringView<'b> {
        let blob = &self.bytes[self.header.str_blob_offset()..self.header.str_table_offset()];
        let offsets = &self.bytes[self.header.str_table_offset()..self.header.rule_index_offset()];
        StringView::new(blob, offsets, self.header.str_count)
    }

    pub fn name(&self) -> Result<&'b str, Error> {
        Ok(self.strings().get_str(self.header.name)?)
    }

    /// Rule names in definition order.
    pub fn rule_names(&self) -> Result<Vec<&'b str>, Error> {
        let strings = self.strings();
        let index = &self.bytes[self.header.rule_index_offset()..self.header.records_offset()];
        let mut names = Vec::with_capacity(self.header.rule_count as usize);
        for raw in index.chunks_exact(4) {
            let id = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
            names.push(strings.get_str(id)?);
        }
        Ok(names)
    }

    /// Rebuilds the grammar and runs [`Grammar::optimize`] on it.
    pub fn decode(&self) -> Result<Grammar, Error> {
        let strings = self.strings();
        let mut grammar = Grammar::new(self.name()?);

        // Declaring up front keeps the rule table in the writer's order.
        let names = self.rule_names()?;
        for name in &names {
            if grammar.find_rule(name).is_some() {
                return Err(FormatError::DuplicateRule((*name).to_owned()).into());
            }
            grammar.declare_rule(name);
        }

        let mut decoder = Decoder {
            bytes: self.bytes,
            pos: self.header.records_offset(),
            strings,
            node_count: 0,
        };

        for expected in &names {
            let name_id = decoder.u32()?;
            let name = strings.get_str(name_id)?;
            if !name.eq_ignore_ascii_case(expected) {
                return Err(FormatError::RecordOutOfOrder {
                    expected: (*expected).to_owned(),
                    found: name.to_owned(),
                }
                .into());
            }
            let root = decoder.node(&mut grammar, 0)?;
            grammar.add_rule(name, root);
        }

        if decoder.pos != self.bytes.len() {
            return Err(FormatError::TrailingBytes(self.bytes.len() - decoder.pos).into());
        }
        if decoder.node_count != self.header.node_count {
            return Err(FormatError::NodeCountMismatch {
                header: self.header.node_count,
                actual: decoder.node_count,
            }
            .into());
        }
        if !grammar.is_complete() {
            let missing = grammar.undefined_rules().map(str::to_owned).collect();
            return Err(FormatError::UnresolvedRules(missing).into());
        }

        grammar.optimize();
        Ok(grammar)
    }
}

struct Decoder<'b> {
    bytes: &'b [u8],
    pos: usize,
    strings: StringView<'b>,
    node_count: u32,
}

impl Decoder<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(FormatError::Truncated(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn u32(&mut self) -> Result<u32, FormatError> {
        let raw = self
            .bytes
            .get(self.pos..self.pos + 4)
            .ok_or(FormatError::Truncated(self.pos))?;
        self.pos += 4;
        Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn children(&mut self, grammar: &mut Grammar, depth: usize) -> Result<Box<[NodeId]>, FormatError> {
        let count = self.u32()? as usize;
        // Every node takes at least one byte.
        if count > self.remaining() {
            return Err(FormatError::Truncated(self.bytes.len()));
        }
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(self.node(grammar, depth + 1)?);
        }
        Ok(children.into())
    }

    fn node(&mut self, grammar: &mut Grammar, depth: usize) -> Result<NodeId, FormatError> {
        if depth > MAX_DEPTH {
            return Err(FormatError::NestingTooDeep);
        }
        self.node_count += 1;

        let offset = self.pos;
        let tag = self.u8()?;
        let recognizer = match Tag::from_u8(tag) {
            Some(Tag::Literal) => {
                let flags = self.u8()?;
                let id = self.u32()?;
                let bytes = self.strings.get(id)?;
                Recognizer::Literal {
                    bytes: bytes.into(),
                    case_insensitive: flags & FLAG_CASE_INSENSITIVE != 0,
                }
            }
            Some(Tag::CharRange) => {
                let lo = self.u32()?;
                let hi = self.u32()?;
                Recognizer::CharRange { lo, hi }
            }
            Some(Tag::Sequence) => Recognizer::Sequence(self.children(grammar, depth)?),
            Some(Tag::Choice) => Recognizer::Choice(self.children(grammar, depth)?),
            Some(Tag::Repetition) => {
                let min = self.u32()?;
                let max = self.u32()?;
                let child = self.node(grammar, depth + 1)?;
                Recognizer::Repetition {
                    child,
                    min,
                    max: (max != UNBOUNDED).then_some(max),
                }
            }
            Some(Tag::RuleRef) => {
                let id = self.u32()?;
                let name = self.strings.get_str(id)?;
                Recognizer::RuleRef(grammar.declare_rule(name))
            }
            Some(Tag::Fold) => Recognizer::Fold(self.node(grammar, depth + 1)?),
            None => return Err(FormatError::UnknownTag { tag, offset }),
        };
        Ok(grammar.add_node(recognizer))
    }
}

/// Decodes a grammar from an in-memory file image.
pub fn load_bytes(bytes: &[u8]) -> Result<Grammar, Error> {
    Module::from_bytes(bytes)?.decode()
}

/// Reads and decodes a grammar file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Grammar, Error> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

/// Encodes `grammar` and writes it to `path`.
pub fn write_file(grammar: &Grammar, path: impl AsRef<Path>) -> Result<(), Error> {
    let bytes = super::emit::emit(grammar)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Whether `bytes` starts like a grammar file (magic only).
pub fn has_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&super::constants::MAGIC)
}
