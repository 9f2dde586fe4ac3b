//! Recursive-descent matcher over a recognizer graph.
//!
//! Ordered choice with PEG commit semantics:
//!
//! - a `Choice` commits to the first alternative that consumed input; if
//!   every successful alternative matched empty, the first of them wins
//! - a `Repetition` is greedy, never gives back iterations, and stops after
//!   an iteration that consumed nothing
//!
//! On failure a node leaves the effect log exactly as it found it.

use rekog_core::{BYTE_LIMIT, FirstSets, Grammar, NodeId, Recognizer, RuleId};

use super::effect::{EffectLog, RuleEffect};
use super::trace::Tracer;

pub struct Matcher<'g, 'i, 'o, T: Tracer> {
    grammar: &'g Grammar,
    first_sets: Option<&'g FirstSets>,
    input: &'i [u8],
    /// Indexed by rule slot.
    observed: &'o [bool],
    effects: EffectLog,
    tracer: &'o mut T,
}

impl<'g, 'i, 'o, T: Tracer> Matcher<'g, 'i, 'o, T> {
    pub fn new(
        grammar: &'g Grammar,
        input: &'i [u8],
        observed: &'o [bool],
        tracer: &'o mut T,
    ) -> Self {
        Self {
            grammar,
            first_sets: grammar.first_sets(),
            input,
            observed,
            effects: EffectLog::new(),
            tracer,
        }
    }

    /// Matches `rule` at `start`. The root is always recorded, observed or not.
    ///
    /// Returns the end offset and the effect log of the match.
    pub fn run(mut self, rule: RuleId, start: usize) -> Option<(usize, EffectLog)> {
        let end = self.rule(rule, start, true)?;
        Some((end, self.effects))
    }

    fn is_observed(&self, rule: RuleId) -> bool {
        self.observed.get(rule.index()).copied().unwrap_or(false)
    }

    fn rule(&mut self, rule: RuleId, pos: usize, record: bool) -> Option<usize> {
        let root = self.grammar.ensure_root(rule);
        self.tracer.trace_enter(rule, pos);

        let watermark = self.effects.len();
        if record {
            self.effects.push(RuleEffect::Enter { rule, start: pos });
        }

        match self.node(root, pos) {
            Some(end) => {
                if record {
                    self.effects.push(RuleEffect::Exit { end });
                }
                self.tracer.trace_exit(rule, pos, end);
                Some(end)
            }
            None => {
                self.effects.truncate(watermark);
                self.tracer.trace_fail(rule, pos);
                None
            }
        }
    }

    fn node(&mut self, id: NodeId, pos: usize) -> Option<usize> {
        let grammar = self.grammar;
        match grammar.node(id) {
            Recognizer::Literal {
                bytes,
                case_insensitive,
            } => self.literal(bytes, *case_insensitive, pos),
            &Recognizer::CharRange { lo, hi } => self.char_range(lo, hi, pos),
            Recognizer::Sequence(children) => self.sequence(children, pos),
            Recognizer::Choice(alternatives) => self.choice(alternatives, pos),
            &Recognizer::Repetition { child, min, max } => self.repetition(child, min, max, pos),
            &Recognizer::RuleRef(rule) => {
                let record = self.is_observed(rule);
                self.rule(rule, pos, record)
            }
            &Recognizer::Fold(child) => self.node(child, pos),
        }
    }

    fn literal(&self, bytes: &[u8], case_insensitive: bool, pos: usize) -> Option<usize> {
        let end = pos.checked_add(bytes.len())?;
        let window = self.input.get(pos..end)?;
        let matched = if case_insensitive {
            window.eq_ignore_ascii_case(bytes)
        } else {
            window == bytes
        };
        matched.then_some(end)
    }

    fn char_range(&self, lo: u32, hi: u32, pos: usize) -> Option<usize> {
        if hi < BYTE_LIMIT {
            let byte = u32::from(*self.input.get(pos)?);
            return (lo..=hi).contains(&byte).then_some(pos + 1);
        }
        let (scalar, len) = decode_scalar(&self.input[pos.min(self.input.len())..])?;
        (lo..=hi).contains(&scalar).then_some(pos + len)
    }

    fn sequence(&mut self, children: &[NodeId], pos: usize) -> Option<usize> {
        let watermark = self.effects.len();
        let mut cursor = pos;
        for &child in children {
            match self.node(child, cursor) {
                Some(end) => cursor = end,
                None => {
                    self.effects.truncate(watermark);
                    return None;
                }
            }
        }
        Some(cursor)
    }

    fn choice(&mut self, alternatives: &[NodeId], pos: usize) -> Option<usize> {
        let next = self.input.get(pos).copied();
        // First alternative that matched empty, with the effects it recorded.
        let mut empty: Option<Vec<RuleEffect>> = None;

        for &alternative in alternatives {
            if let Some(sets) = self.first_sets
                && !sets.get(alternative).accepts(next)
            {
                continue;
            }

            let watermark = self.effects.len();
            match self.node(alternative, pos) {
                Some(end) if end > pos => return Some(end),
                Some(_) => {
                    let recorded = self.effects.split_off(watermark);
                    empty.get_or_insert(recorded);
                }
                None => {}
            }
        }

        let recorded = empty?;
        self.effects.extend(recorded);
        Some(pos)
    }

    fn repetition(&mut self, child: NodeId, min: u32, max: Option<u32>, pos: usize) -> Option<usize> {
        let watermark = self.effects.len();
        let mut count = 0u32;
        let mut cursor = pos;

        while max.is_none_or(|max| count < max) {
            let Some(end) = self.node(child, cursor) else {
                break;
            };
            count += 1;
            if end == cursor {
                // Further iterations would match empty too.
                count = count.max(min);
                break;
            }
            cursor = end;
        }

        if count < min {
            self.effects.truncate(watermark);
            return None;
        }
        Some(cursor)
    }
}

/// Decodes one UTF-8 scalar at the start of `bytes`.
fn decode_scalar(bytes: &[u8]) -> Option<(u32, usize)> {
    let len = match *bytes.first()? {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let text = std::str::from_utf8(bytes.get(..len)?).ok()?;
    let scalar = text.chars().next()?;
    Some((u32::from(scalar), len))
}
