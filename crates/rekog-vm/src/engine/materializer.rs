//! Materializers turn effect logs into output values.

use rekog_core::{RuleId, Span};

use super::effect::RuleEffect;

/// Builds an output value from the effects of one successful match.
pub trait Materializer {
    type Output;

    fn materialize(&self, effects: &[RuleEffect], input: &[u8]) -> Self::Output;
}

/// A rule boundary seen while replaying a log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Open(RuleId),
    /// The rule and its full span.
    Close(RuleId, Span),
}

/// Replays an effect log as properly nested open/close events.
///
/// Logs produced by the matcher are always balanced; an unbalanced log is a
/// bug and panics.
pub(crate) fn replay(effects: &[RuleEffect], mut visit: impl FnMut(Event)) {
    let mut stack: Vec<(RuleId, usize)> = Vec::new();
    for (index, effect) in effects.iter().enumerate() {
        match *effect {
            RuleEffect::Enter { rule, start } => {
                stack.push((rule, start));
                visit(Event::Open(rule));
            }
            RuleEffect::Exit { end } => {
                let Some((rule, start)) = stack.pop() else {
                    panic!("effect {index}: Exit without a matching Enter");
                };
                visit(Event::Close(rule, Span::from_range(start..end)));
            }
        }
    }
    assert!(stack.is_empty(), "effect log ends with {} open rules", stack.len());
}
