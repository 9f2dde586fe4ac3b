//! First-byte sets for choice pruning.
//!
//! For each node we compute the set of bytes a successful non-empty match
//! can start with, plus whether the node can match the empty string. The
//! sets are over-approximations: they are only used to skip alternatives
//! that cannot possibly match at the current position.

use crate::grammar::Grammar;
use crate::recognizer::{BYTE_LIMIT, NodeId, Recognizer};

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstSet {
    bits: [u64; 4],
    nullable: bool,
}

impl FirstSet {
    const FULL: FirstSet = FirstSet {
        bits: [u64::MAX; 4],
        nullable: true,
    };

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.bits[(byte >> 6) as usize] & (1 << (byte & 63)) != 0
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether a match may start in front of `next` (`None` at end of input).
    #[inline]
    pub fn accepts(&self, next: Option<u8>) -> bool {
        self.nullable || next.is_some_and(|b| self.contains(b))
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    fn insert(&mut self, byte: u8) {
        self.bits[(byte >> 6) as usize] |= 1 << (byte & 63);
    }

    fn insert_range(&mut self, lo: u8, hi: u8) {
        for b in lo..=hi {
            self.insert(b);
        }
    }

    fn union_bits(&mut self, other: &FirstSet) {
        for (dst, src) in self.bits.iter_mut().zip(other.bits) {
            *dst |= src;
        }
    }
}

impl std::fmt::Debug for FirstSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstSet")
            .field("len", &self.len())
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// First sets for every node of a grammar, indexed by [`NodeId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstSets(Vec<FirstSet>);

impl FirstSets {
    /// Fixpoint over the arena. Sets only grow, so this terminates once an
    /// iteration changes nothing.
    pub(crate) fn compute(grammar: &Grammar) -> Self {
        let mut sets = vec![FirstSet::default(); grammar.node_count()];
        loop {
            let mut changed = false;
            for index in 0..sets.len() {
                let id = NodeId::from_index(index);
                let next = eval(grammar, &sets, id);
                if next != sets[index] {
                    sets[index] = next;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        Self(sets)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &FirstSet {
        &self.0[id.index()]
    }
}

fn eval(grammar: &Grammar, sets: &[FirstSet], id: NodeId) -> FirstSet {
    let mut set = FirstSet::default();
    match grammar.node(id) {
        Recognizer::Literal {
            bytes,
            case_insensitive,
        } => match bytes.first() {
            None => set.nullable = true,
            Some(&b) => {
                set.insert(b);
                if *case_insensitive {
                    set.insert(b.to_ascii_lowercase());
                    set.insert(b.to_ascii_uppercase());
                }
            }
        },
        &Recognizer::CharRange { lo, hi } => {
            if hi < BYTE_LIMIT {
                set.insert_range(lo as u8, hi as u8);
            } else {
                if lo < 0x80 {
                    set.insert_range(lo as u8, 0x7F);
                }
                // UTF-8 lead bytes of multi-byte sequences.
                set.insert_range(0xC2, 0xF4);
            }
        }
        Recognizer::Sequence(children) => {
            set.nullable = true;
            for child in children.iter() {
                let child = &sets[child.index()];
                set.union_bits(child);
                if !child.nullable {
                    set.nullable = false;
                    break;
                }
            }
        }
        Recognizer::Choice(children) => {
            for child in children.iter() {
                let child = &sets[child.index()];
                set.union_bits(child);
                set.nullable |= child.nullable;
            }
        }
        &Recognizer::Repetition { child, min, max } => {
            if max != Some(0) {
                set = sets[child.index()];
            }
            set.nullable |= min == 0;
        }
        &Recognizer::RuleRef(rule) => match grammar.rule_root(rule) {
            Some(root) => set = sets[root.index()],
            None => set = FirstSet::FULL,
        },
        &Recognizer::Fold(child) => set = sets[child.index()],
    }
    set
}
