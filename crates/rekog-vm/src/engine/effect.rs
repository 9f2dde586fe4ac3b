//! Rule effects recorded during matching.
//!
//! The matcher only records entries and exits of observed rules. Everything
//! else about a match is implied by the spans between them.

use rekog_core::RuleId;

/// Effect produced by the matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleEffect {
    /// An observed rule started matching at `start`.
    Enter { rule: RuleId, start: usize },
    /// The innermost open rule matched up to `end`.
    Exit { end: usize },
}

/// Effect log with truncation support for backtracking.
#[derive(Debug, Default)]
pub struct EffectLog(Vec<RuleEffect>);

impl EffectLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, effect: RuleEffect) {
        self.0.push(effect);
    }

    /// Current length, used as the watermark for backtracking.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops everything recorded after `watermark`.
    #[inline]
    pub fn truncate(&mut self, watermark: usize) {
        self.0.truncate(watermark);
    }

    /// Removes and returns everything recorded after `watermark`.
    pub fn split_off(&mut self, watermark: usize) -> Vec<RuleEffect> {
        self.0.split_off(watermark)
    }

    pub fn extend(&mut self, effects: Vec<RuleEffect>) {
        self.0.extend(effects);
    }

    pub fn as_slice(&self) -> &[RuleEffect] {
        &self.0
    }
}
