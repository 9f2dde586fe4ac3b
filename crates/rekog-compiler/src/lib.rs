//! ABNF compiler for rekog.
//!
//! - `parser` - logos lexer, rowan CST and typed AST wrappers
//! - `diagnostics` - span-based error reporting rendered with annotate-snippets
//! - lowering - CST to [`rekog_core::Grammar`]
//!
//! [`Compiler`] ties the stages together.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod parser;

mod compiler;
mod lower;

#[cfg(test)]
mod compiler_tests;
#[cfg(test)]
pub mod test_utils;

pub use compiler::{Compilation, CompileError, Compiler, compile_file};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
