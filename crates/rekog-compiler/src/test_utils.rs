//! Helpers for parser and compiler tests.

use std::fmt::Write;

use rekog_core::{Grammar, core_rules};

use crate::parser::{SyntaxNode, parse};
use crate::{CompileError, Compiler, Diagnostics};

/// CST without trivia, one node or token per line.
pub fn dump_cst(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_node(node, 0, &mut out);
    out
}

fn write_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{:?}", "  ".repeat(depth), node.kind());
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => write_node(&n, depth + 1, out),
            rowan::NodeOrToken::Token(t) if !t.kind().is_trivia() => {
                let _ = writeln!(out, "{}{:?} {:?}", "  ".repeat(depth + 1), t.kind(), t.text());
            }
            rowan::NodeOrToken::Token(_) => {}
        }
    }
}

/// Parses `source`, asserting it is free of diagnostics.
pub fn expect_valid_cst(source: &str) -> String {
    let (parse, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics:\n{diagnostics}");
    dump_cst(&parse.syntax())
}

/// Parses `source`, asserting it produced errors.
pub fn expect_parse_errors(source: &str) -> Diagnostics {
    let (_, diagnostics) = parse(source);
    assert!(diagnostics.has_errors(), "expected parse errors");
    diagnostics
}

/// Compiles against the core rules, panicking with rendered diagnostics on failure.
pub fn compile(source: &str) -> Grammar {
    let core = core_rules();
    match Compiler::new(source).base(&core).compile() {
        Ok(compilation) => compilation.grammar,
        Err(CompileError::Invalid(diagnostics)) => {
            panic!("compilation failed:\n{}", diagnostics.render(source))
        }
        Err(err) => panic!("{err}"),
    }
}

/// Compiles without a base, returning the diagnostics of the failure.
pub fn compile_errors(source: &str) -> Diagnostics {
    match Compiler::new(source).compile() {
        Ok(_) => panic!("expected compilation to fail"),
        Err(CompileError::Invalid(diagnostics)) => diagnostics,
        Err(err) => panic!("{err}"),
    }
}
