//! Shared fixtures for runtime tests.

use rekog_compiler::{CompileError, Compiler};
use rekog_core::{Grammar, core_rules};

/// Compiles `source` against the core rules.
pub fn grammar(source: &str) -> Grammar {
    let core = core_rules();
    match Compiler::new(source).name("test").base(&core).compile() {
        Ok(compilation) => compilation.grammar,
        Err(CompileError::Invalid(diagnostics)) => {
            panic!("compilation failed:\n{}", diagnostics.render(source))
        }
        Err(err) => panic!("{err}"),
    }
}

/// Compiles `source` on its own, leaving undefined references in place.
pub fn incomplete_grammar(source: &str) -> Grammar {
    Compiler::new(source)
        .name("test")
        .allow_incomplete(true)
        .compile()
        .map(|compilation| compilation.grammar)
        .unwrap_or_else(|err| panic!("{err}"))
}
