//! Node tags of the rule record stream.

/// One byte in front of every encoded node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    /// `flags: u8`, `bytes: str id`
    Literal = 1,
    /// `lo: u32`, `hi: u32`
    CharRange = 2,
    /// `count: u32`, then `count` nodes
    Sequence = 3,
    /// `count: u32`, then `count` nodes
    Choice = 4,
    /// `min: u32`, `max: u32` (`UNBOUNDED` for none), then one node
    Repetition = 5,
    /// `name: str id`
    RuleRef = 6,
    /// one node
    Fold = 7,
}

impl Tag {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Tag::Literal,
            2 => Tag::CharRange,
            3 => Tag::Sequence,
            4 => Tag::Choice,
            5 => Tag::Repetition,
            6 => Tag::RuleRef,
            7 => Tag::Fold,
            _ => return None,
        })
    }
}
