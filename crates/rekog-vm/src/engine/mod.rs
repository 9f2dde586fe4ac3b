//! Matching engine.
//!
//! The matcher walks a grammar's recognizer graph against an input buffer and
//! records an effect log of observed rule entries and exits. A
//! [`Materializer`] then turns the log into an output value.

mod effect;
mod materializer;
mod matcher;
mod trace;

#[cfg(test)]
mod trace_tests;

pub use effect::{EffectLog, RuleEffect};
pub use matcher::Matcher;
pub use materializer::Materializer;
pub use trace::{NoopTracer, PrintTracer, Tracer};

pub(crate) use materializer::{Event, replay};
