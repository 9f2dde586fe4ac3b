//! Fatal configuration errors.
//!
//! Wiring a parser to a rule that does not exist, or matching through a
//! rule that was never defined, is a bug in the grammar or the binding
//! code, not a property of the input. These paths log and panic.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::grammar::Grammar;
use crate::recognizer::{NodeId, RuleId};

/// Logs `message` at error level, then panics with it.
#[cold]
#[track_caller]
pub fn fatal(message: impl std::fmt::Display) -> ! {
    log::error!("{message}");
    panic!("{message}");
}

impl Grammar {
    /// Resolves a defined rule or aborts.
    #[track_caller]
    pub fn ensure_rule(&self, name: &str) -> RuleId {
        match self.rule(name) {
            Ok(id) => id,
            Err(err) => fatal(format_args!("grammar `{}`: {err}", self.name())),
        }
    }

    /// Root of a rule reached at match time.
    #[track_caller]
    pub fn ensure_root(&self, id: RuleId) -> NodeId {
        self.rule_root(id).unwrap_or_else(|| {
            fatal(format_args!(
                "grammar `{}`: rule `{}` is referenced but never defined",
                self.name(),
                self.rule_name(id)
            ))
        })
    }
}
