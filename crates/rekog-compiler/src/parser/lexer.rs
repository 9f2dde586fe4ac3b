//! Lexer for ABNF.
//!
//! Tokens carry only a kind and a span. Characters outside the ABNF alphabet
//! (a stray `@`, `{`, a bare `%` ...) are merged into one `Garbage` token per
//! run, so the parser reports a single error and column-0 rule starts on the
//! following lines are still seen.

use std::ops::Range;

use logos::Logos;
use rowan::TextRange;

use super::cst::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span: TextRange::new((span.start as u32).into(), (span.end as u32).into()),
        }
    }
}

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut garbage: Option<Range<usize>> = None;

    for (kind, span) in SyntaxKind::lexer(source).spanned() {
        match kind {
            Ok(kind) => {
                if let Some(run) = garbage.take() {
                    tokens.push(Token::new(SyntaxKind::Garbage, run));
                }
                tokens.push(Token::new(kind, span));
            }
            Err(()) => match &mut garbage {
                Some(run) => run.end = span.end,
                None => garbage = Some(span),
            },
        }
    }
    if let Some(run) = garbage {
        tokens.push(Token::new(SyntaxKind::Garbage, run));
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
