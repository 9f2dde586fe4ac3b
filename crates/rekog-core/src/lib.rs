#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for rekog grammars.
//!
//! - [`Recognizer`]: closed set of compiled node kinds, stored in an arena
//! - [`Grammar`]: rule table mapping case-insensitive names to node roots
//! - [`core_rules`]: the RFC 5234 primitives, usable as a base grammar
//! - [`FirstSets`]: first-byte sets computed by [`Grammar::optimize`]

mod core_rules;
mod display;
mod first_set;
mod grammar;
mod invariants;
mod recognizer;
mod span;

#[cfg(test)]
mod grammar_tests;

pub use core_rules::{CORE_RULE_NAMES, core_rules};
pub use first_set::{FirstSet, FirstSets};
pub use grammar::{Grammar, GrammarError};
pub use invariants::fatal;
pub use recognizer::{BYTE_LIMIT, MAX_CODE_POINT, NodeId, Recognizer, RuleId};
pub use span::Span;
