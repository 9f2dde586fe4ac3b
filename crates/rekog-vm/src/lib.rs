//! Matching and binding runtime for rekog grammars.
//!
//! - [`Parser`] binds rule matches to user-supplied constructors and collectors
//! - [`DebugParser`] builds a generic [`DebugElement`] tree instead
//! - [`engine`] holds the matcher, effect log and tracers both are built on

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

mod binding;
mod debug;

#[cfg(test)]
mod binding_tests;
#[cfg(test)]
mod test_utils;

pub use binding::{HandlerBuilder, Parsed, Parser};
pub use debug::{DebugElement, DebugParser};
pub use engine::{NoopTracer, PrintTracer, Tracer};
