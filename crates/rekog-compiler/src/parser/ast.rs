//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens in lowering.

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }

            pub fn text_range(&self) -> TextRange {
                self.0.text_range()
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Rule, Rule);
ast_node!(Alternation, Alternation);
ast_node!(Concatenation, Concatenation);
ast_node!(Repetition, Repetition);
ast_node!(Repeat, Repeat);
ast_node!(Ref, Ref);
ast_node!(Str, Str);
ast_node!(Num, Num);
ast_node!(Prose, Prose);
ast_node!(Group, Group);
ast_node!(Optional, Optional);

/// Anything that can appear on the right of `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Alternation(Alternation),
    Concatenation(Concatenation),
    Repetition(Repetition),
    Ref(Ref),
    Str(Str),
    Num(Num),
    Prose(Prose),
    Group(Group),
    Optional(Optional),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Alternation => Alternation::cast(node).map(Expr::Alternation),
            SyntaxKind::Concatenation => Concatenation::cast(node).map(Expr::Concatenation),
            SyntaxKind::Repetition => Repetition::cast(node).map(Expr::Repetition),
            SyntaxKind::Ref => Ref::cast(node).map(Expr::Ref),
            SyntaxKind::Str => Str::cast(node).map(Expr::Str),
            SyntaxKind::Num => Num::cast(node).map(Expr::Num),
            SyntaxKind::Prose => Prose::cast(node).map(Expr::Prose),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Optional => Optional::cast(node).map(Expr::Optional),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Alternation(n) => n.as_cst(),
            Expr::Concatenation(n) => n.as_cst(),
            Expr::Repetition(n) => n.as_cst(),
            Expr::Ref(n) => n.as_cst(),
            Expr::Str(n) => n.as_cst(),
            Expr::Num(n) => n.as_cst(),
            Expr::Prose(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Optional(n) => n.as_cst(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.as_cst().text_range()
    }
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

impl Root {
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.0.children().filter_map(Rule::cast)
    }
}

impl Rule {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::RuleName)
    }

    /// The `=` or `=/` token.
    pub fn defined_as(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Equals | SyntaxKind::IncEquals))
    }

    pub fn is_incremental(&self) -> bool {
        self.defined_as()
            .is_some_and(|t| t.kind() == SyntaxKind::IncEquals)
    }

    pub fn body(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Alternation {
    pub fn branches(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Concatenation {
    pub fn items(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Repetition {
    pub fn repeat(&self) -> Option<Repeat> {
        self.0.children().find_map(Repeat::cast)
    }

    pub fn element(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

/// Shape of a repeat prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatOp {
    /// `n`
    Exact,
    /// `n*m` and its shorthands
    Range,
    /// `n#m` list
    List,
}

impl Repeat {
    pub fn op(&self) -> RepeatOp {
        if token(&self.0, SyntaxKind::Hash).is_some() {
            RepeatOp::List
        } else if token(&self.0, SyntaxKind::Star).is_some() {
            RepeatOp::Range
        } else {
            RepeatOp::Exact
        }
    }

    /// The number before the operator (or the only number for `n`).
    pub fn min(&self) -> Option<SyntaxToken> {
        let first = self.0.first_token()?;
        (first.kind() == SyntaxKind::Number).then_some(first)
    }

    /// The number after the operator.
    pub fn max(&self) -> Option<SyntaxToken> {
        if self.op() == RepeatOp::Exact {
            return None;
        }
        let last = self.0.last_token()?;
        (last.kind() == SyntaxKind::Number).then_some(last)
    }
}

impl Ref {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::RuleName)
    }
}

impl Str {
    pub fn token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::CharVal)
    }
}

impl Num {
    pub fn token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::NumVal)
    }
}

impl Prose {
    pub fn token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::ProseVal)
    }
}

impl Group {
    pub fn body(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Optional {
    pub fn body(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}
