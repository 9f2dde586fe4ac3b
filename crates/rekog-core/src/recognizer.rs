//! Recognizer nodes.
//!
//! A grammar is an arena of [`Recognizer`] nodes addressed by [`NodeId`].
//! Rule references never point at nodes directly: they carry a [`RuleId`]
//! resolved through the owning grammar's rule table, which is what allows
//! forward references and (mutual) recursion without ownership cycles.

/// Index of a node in a grammar's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a rule slot in a grammar's rule table.
///
/// A slot exists as soon as the name is declared or referenced; it may
/// still be undefined (see [`crate::Grammar::is_complete`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Upper bound (exclusive) of code points that match as a single raw byte.
pub const BYTE_LIMIT: u32 = 0x100;

/// Largest valid Unicode scalar value.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Compiled grammar node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recognizer {
    /// Exact byte sequence. ASCII letters compare case-insensitively when
    /// `case_insensitive` is set.
    Literal {
        bytes: Box<[u8]>,
        case_insensitive: bool,
    },
    /// Inclusive code point range. Ranges below [`BYTE_LIMIT`] consume one
    /// byte, wider ranges consume one UTF-8 encoded scalar.
    CharRange { lo: u32, hi: u32 },
    Sequence(Box<[NodeId]>),
    /// Ordered alternatives.
    Choice(Box<[NodeId]>),
    /// `max == None` means unbounded.
    Repetition {
        child: NodeId,
        min: u32,
        max: Option<u32>,
    },
    RuleRef(RuleId),
    /// Transparent grouping with no rule identity of its own.
    Fold(NodeId),
}

impl Recognizer {
    pub fn literal(text: &str, case_insensitive: bool) -> Self {
        Self::Literal {
            bytes: text.as_bytes().into(),
            case_insensitive,
        }
    }

    pub fn char(code_point: u32) -> Self {
        Self::CharRange {
            lo: code_point,
            hi: code_point,
        }
    }

    pub fn range(lo: u32, hi: u32) -> Self {
        Self::CharRange { lo, hi }
    }

    pub fn optional(child: NodeId) -> Self {
        Self::Repetition {
            child,
            min: 0,
            max: Some(1),
        }
    }

    /// Direct children in match order. Rule references have none.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Recognizer::Sequence(children) | Recognizer::Choice(children) => children,
            Recognizer::Repetition { child, .. } | Recognizer::Fold(child) => {
                std::slice::from_ref(child)
            }
            Recognizer::Literal { .. } | Recognizer::CharRange { .. } | Recognizer::RuleRef(_) => {
                &[]
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Recognizer::Literal { .. } => "literal",
            Recognizer::CharRange { .. } => "char-range",
            Recognizer::Sequence(_) => "sequence",
            Recognizer::Choice(_) => "choice",
            Recognizer::Repetition { .. } => "repetition",
            Recognizer::RuleRef(_) => "rule-ref",
            Recognizer::Fold(_) => "fold",
        }
    }

    /// Rewrites every node and rule handle through the given maps.
    pub(crate) fn remap(
        &self,
        node: impl Fn(NodeId) -> NodeId,
        rule: impl Fn(RuleId) -> RuleId,
    ) -> Self {
        match self {
            Recognizer::Literal { .. } | Recognizer::CharRange { .. } => self.clone(),
            Recognizer::Sequence(children) => {
                Recognizer::Sequence(children.iter().map(|&c| node(c)).collect())
            }
            Recognizer::Choice(children) => {
                Recognizer::Choice(children.iter().map(|&c| node(c)).collect())
            }
            Recognizer::Repetition { child, min, max } => Recognizer::Repetition {
                child: node(*child),
                min: *min,
                max: *max,
            },
            Recognizer::RuleRef(target) => Recognizer::RuleRef(rule(*target)),
            Recognizer::Fold(child) => Recognizer::Fold(node(*child)),
        }
    }
}
