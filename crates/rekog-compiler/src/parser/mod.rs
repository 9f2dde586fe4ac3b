//! ABNF parser infrastructure.
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments/newlines collected, then attached as leading trivia
//! - Checkpoint-based wrapping: alternations and concatenations are only materialized
//!   when they have more than one operand
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree, and a malformed rule
//! never swallows the rule after it.
//!
//! 1. Tokens that cannot continue a rule are wrapped in a `SyntaxKind::Error` node up to
//!    the next column-0 token
//! 2. Missing expected tokens emit a diagnostic but don't consume
//! 3. Unclosed groups and options end where their rule ends
//! 4. On recursion limit, the rest of the rule goes into a single Error node

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod ast_tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    Alternation, Concatenation, Expr, Group, Num, Optional, Prose, Ref, Repeat, RepeatOp,
    Repetition, Root, Rule, Str,
};

pub use core::{DEFAULT_RECURSION_LIMIT, Parser};

use crate::diagnostics::Diagnostics;
use lexer::lex;

/// Parse result containing the green tree.
///
/// The tree is always complete; diagnostics are returned separately.
/// Error nodes in the tree represent recovery points.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
}

impl Parse {
    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn root(&self) -> Root {
        Root::cast(self.syntax()).expect("parser always produces Root")
    }
}

/// Main entry point.
pub fn parse(source: &str) -> (Parse, Diagnostics) {
    parse_with_parser(Parser::new(source, lex(source)))
}

/// Parse with a pre-configured parser (for custom recursion limits).
pub fn parse_with_parser(mut parser: Parser) -> (Parse, Diagnostics) {
    parser.parse_root();
    let (cst, diagnostics) = parser.finish();
    (Parse { cst }, diagnostics)
}
