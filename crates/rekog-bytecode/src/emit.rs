//! Grammar → bytes.

use rekog_core::{Grammar, NodeId, Recognizer};

use super::constants::{FLAG_CASE_INSENSITIVE, HEADER_SIZE, UNBOUNDED};
use super::error::Error;
use super::header::Header;
use super::strings::StringTable;
use super::tag::Tag;

struct Emitter<'g> {
    grammar: &'g Grammar,
    strings: StringTable,
    records: Vec<u8>,
    node_count: u32,
}

/// Serializes a complete grammar.
///
/// Rules are indexed and written in definition order; every subtree is
/// encoded inline, so rule references are the only links between records.
pub fn emit(grammar: &Grammar) -> Result<Vec<u8>, Error> {
    if !grammar.is_complete() {
        return Err(Error::Incomplete {
            grammar: grammar.name().to_owned(),
            rules: grammar.undefined_rules().map(str::to_owned).collect(),
        });
    }

    let mut emitter = Emitter {
        grammar,
        strings: StringTable::new(),
        records: Vec::new(),
        node_count: 0,
    };
    let name = emitter.strings.intern(grammar.name().as_bytes());

    let mut index = Vec::new();
    for (_, rule_name, root) in grammar.rules() {
        let id = emitter.strings.intern(rule_name.as_bytes());
        index.push(id);
        emitter.put_u32(id);
        emitter.node(root);
    }
    let rule_count = index.len() as u32;

    let (blob, offsets) = emitter.strings.to_blob();

    let mut out = vec![0u8; HEADER_SIZE];
    out.extend_from_slice(&blob);
    for offset in offsets.iter().chain(&index) {
        out.extend_from_slice(&offset.to_be_bytes());
    }
    out.extend_from_slice(&emitter.records);

    let header = Header {
        checksum: crc32fast::hash(&out[HEADER_SIZE..]),
        total_size: out.len() as u32,
        str_blob_size: blob.len() as u32,
        str_count: (offsets.len() - 1) as u32,
        rule_count,
        node_count: emitter.node_count,
        name,
        ..Header::default()
    };
    out[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

    log::debug!(
        "emitted grammar `{}`: {} rules, {} nodes, {} bytes",
        grammar.name(),
        rule_count,
        emitter.node_count,
        out.len()
    );
    Ok(out)
}

impl Emitter<'_> {
    fn put_u8(&mut self, value: u8) {
        self.records.push(value);
    }

    fn put_u32(&mut self, value: u32) {
        self.records.extend_from_slice(&value.to_be_bytes());
    }

    fn children(&mut self, tag: Tag, children: &[NodeId]) {
        self.put_u8(tag as u8);
        self.put_u32(children.len() as u32);
        for &child in children {
            self.node(child);
        }
    }

    fn node(&mut self, id: NodeId) {
        self.node_count += 1;
        let grammar = self.grammar;
        match grammar.node(id) {
            Recognizer::Literal {
                bytes,
                case_insensitive,
            } => {
                let flags = if *case_insensitive {
                    FLAG_CASE_INSENSITIVE
                } else {
                    0
                };
                let string = self.strings.intern(bytes);
                self.put_u8(Tag::Literal as u8);
                self.put_u8(flags);
                self.put_u32(string);
            }
            &Recognizer::CharRange { lo, hi } => {
                self.put_u8(Tag::CharRange as u8);
                self.put_u32(lo);
                self.put_u32(hi);
            }
            Recognizer::Sequence(children) => self.children(Tag::Sequence, children),
            Recognizer::Choice(children) => self.children(Tag::Choice, children),
            &Recognizer::Repetition { child, min, max } => {
                self.put_u8(Tag::Repetition as u8);
                self.put_u32(min);
                self.put_u32(max.unwrap_or(UNBOUNDED));
                self.node(child);
            }
            &Recognizer::RuleRef(rule) => {
                let name = grammar.rule_name(rule);
                let string = self.strings.intern(name.as_bytes());
                self.put_u8(Tag::RuleRef as u8);
                self.put_u32(string);
            }
            &Recognizer::Fold(child) => {
                self.put_u8(Tag::Fold as u8);
                self.node(child);
            }
        }
    }
}
