//! Syntax kinds for ABNF.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `AbnfLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("=")]
    Equals,

    /// Incremental alternative `=/`. Longer than `Equals` so it wins.
    #[token("=/")]
    IncEquals,

    #[token("/")]
    Slash,

    #[token("*")]
    Star,

    /// List repetition `n#m` (RFC 7230).
    #[token("#")]
    Hash,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[A-Za-z][A-Za-z0-9\-]*")]
    RuleName,

    /// `"..."`, `%s"..."` or `%i"..."`.
    #[regex(r#""[^"\r\n]*""#)]
    #[regex(r#"%[sSiI]"[^"\r\n]*""#)]
    CharVal,

    /// Quoted string missing its closing quote before the end of the line.
    #[regex(r#""[^"\r\n]*"#)]
    #[regex(r#"%[sSiI]"[^"\r\n]*"#)]
    UnterminatedStr,

    /// `%b`, `%d` or `%x` value. Digits are validated during lowering.
    #[regex(r"%[bBdDxX][0-9A-Za-z.\-]*")]
    NumVal,

    #[regex(r"<[^>\r\n]*>")]
    ProseVal,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r";[^\r\n]*", allow_greedy = true)]
    Comment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Rule,
    Alternation,
    Concatenation,
    Repetition,
    Repeat,
    Ref,
    Str,
    Num,
    Prose,
    Group,
    Optional,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | Comment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage | UnterminatedStr)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbnfLang {}

impl Language for AbnfLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<AbnfLang>;
pub type SyntaxToken = rowan::SyntaxToken<AbnfLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind = AbnfLang::kind_from_raw(rowan::SyntaxKind(i));
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// Tokens that start an element proper.
    pub const ELEMENT_FIRST: TokenSet = TokenSet::new(&[
        RuleName,
        ParenOpen,
        BracketOpen,
        CharVal,
        UnterminatedStr,
        NumVal,
        ProseVal,
    ]);

    /// Tokens that start a repeat prefix.
    pub const REPEAT_FIRST: TokenSet = TokenSet::new(&[Number, Star, Hash]);

    /// FIRST set of a repetition.
    pub const REPETITION_FIRST: TokenSet = ELEMENT_FIRST.union(REPEAT_FIRST);

    pub const DEFINED_AS: TokenSet = TokenSet::new(&[Equals, IncEquals]);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, Comment]);
}
