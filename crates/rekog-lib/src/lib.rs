//! rekog: ABNF grammars compiled to recognizers, with typed binding of matches.
//!
//! # Example
//!
//! ```
//! use rekog_lib::{Compiler, Parser, core_rules};
//!
//! let source = "port = 1*DIGIT\nhostport = host [ \":\" port ]\nhost = 1*ALPHA\n";
//! let core = core_rules();
//! let grammar = Compiler::new(source).base(&core).compile().unwrap().grammar;
//!
//! #[derive(Default)]
//! struct HostPort {
//!     host: String,
//!     port: i64,
//! }
//!
//! let mut parser = Parser::new(&grammar);
//! parser
//!     .set_handler("hostport", HostPort::default)
//!     .set_collector("host", |hp, text| hp.host = text.to_owned())
//!     .set_int_collector("port", |hp, port| hp.port = port);
//!
//! let parsed = parser.parse_input("hostport", "example:5060").unwrap();
//! let value = parsed.value.unwrap();
//! assert_eq!((value.host.as_str(), value.port), ("example", 5060));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod loader;

mod grammar_file;

#[cfg(test)]
mod grammar_file_tests;
#[cfg(test)]
mod test_utils;

pub use grammar_file::GrammarFile;
pub use loader::{GrammarLoader, LoaderError, add_grammar_path, load_grammar};

pub use rekog_bytecode as bytecode;
pub use rekog_compiler::{
    Compilation, CompileError, Compiler, Diagnostics, DiagnosticsPrinter, Severity, compile_file,
};
pub use rekog_core::{Grammar, GrammarError, Span, core_rules, fatal};
pub use rekog_vm::{
    DebugElement, DebugParser, HandlerBuilder, NoopTracer, Parsed, Parser, PrintTracer, Tracer,
};
