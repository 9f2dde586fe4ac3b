//! Binding-free parse trees for inspection.

use std::fmt;

use rekog_core::{Grammar, RuleId, Span};
use serde::Serialize;

use crate::engine::{Event, Materializer, Matcher, NoopTracer, RuleEffect, Tracer, replay};

/// One observed rule match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugElement {
    rule: String,
    value: String,
    children: Vec<DebugElement>,
}

impl DebugElement {
    pub fn new(rule: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// The full text the rule matched.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[DebugElement] {
        &self.children
    }

    /// Descendants named `rule` (case-insensitive), depth-first in document
    /// order. Matches are not searched further.
    pub fn find_children(&self, rule: &str) -> Vec<&DebugElement> {
        let mut found = Vec::new();
        self.collect_children(rule, &mut found);
        found
    }

    fn collect_children<'a>(&'a self, rule: &str, found: &mut Vec<&'a DebugElement>) {
        for child in &self.children {
            if child.rule.eq_ignore_ascii_case(rule) {
                found.push(child);
            } else {
                child.collect_children(rule, found);
            }
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        for _ in 0..level {
            f.write_str("\t")?;
        }
        if self.children.is_empty() {
            let value = self.value.replace('\r', "\\r").replace('\n', "\\n");
            return writeln!(f, "{} : '{}'", self.rule, value);
        }
        writeln!(f, "{}", self.rule)?;
        for child in &self.children {
            child.write_tree(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DebugElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Parser that builds a [`DebugElement`] tree of the observed rules.
pub struct DebugParser<'g> {
    grammar: &'g Grammar,
    observed: Vec<bool>,
}

impl<'g> DebugParser<'g> {
    /// Observes every rule of the grammar.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            observed: vec![true; grammar.declared_count()],
        }
    }

    /// Observes only `rules` (plus whatever root is parsed). Matches of other
    /// rules fold into their nearest observed ancestor.
    ///
    /// # Panics
    /// Panics if any name is not defined in the grammar.
    #[track_caller]
    pub fn with_observed<S: AsRef<str>>(grammar: &'g Grammar, rules: &[S]) -> Self {
        let mut observed = vec![false; grammar.declared_count()];
        for rule in rules {
            let id = grammar.ensure_rule(rule.as_ref());
            observed[id.index()] = true;
        }
        Self { grammar, observed }
    }

    pub fn parse_input(&self, rule: &str, input: &str) -> Option<(DebugElement, Span)> {
        self.parse_input_at(rule, input, 0)
    }

    /// # Panics
    /// Panics if `rule` is not defined, or if matching reaches a rule that
    /// was referenced but never defined.
    pub fn parse_input_at(&self, rule: &str, input: &str, start: usize) -> Option<(DebugElement, Span)> {
        self.parse_input_with_tracer(rule, input, start, &mut NoopTracer)
    }

    pub fn parse_input_with_tracer<R: Tracer>(
        &self,
        rule: &str,
        input: &str,
        start: usize,
        tracer: &mut R,
    ) -> Option<(DebugElement, Span)> {
        let root = self.grammar.ensure_rule(rule);
        let bytes = input.as_bytes();
        let (end, effects) = Matcher::new(self.grammar, bytes, &self.observed, tracer).run(root, start)?;

        let tree = TreeMaterializer {
            grammar: self.grammar,
        }
        .materialize(effects.as_slice(), bytes);
        Some((tree, Span::from_range(start..end)))
    }
}

struct TreeMaterializer<'g> {
    grammar: &'g Grammar,
}

impl Materializer for TreeMaterializer<'_> {
    type Output = DebugElement;

    fn materialize(&self, effects: &[RuleEffect], input: &[u8]) -> DebugElement {
        let mut stack: Vec<Vec<DebugElement>> = Vec::new();
        let mut root = None;

        replay(effects, |event| match event {
            Event::Open(_) => stack.push(Vec::new()),
            Event::Close(rule, span) => {
                let children = stack.pop().unwrap_or_default();
                let element = self.element(rule, span, input, children);
                match stack.last_mut() {
                    Some(parent) => parent.push(element),
                    None => root = Some(element),
                }
            }
        });

        // The matcher always records the root, so a successful log is never empty.
        root.unwrap_or_else(|| DebugElement::new("", ""))
    }
}

impl TreeMaterializer<'_> {
    fn element(&self, rule: RuleId, span: Span, input: &[u8], children: Vec<DebugElement>) -> DebugElement {
        DebugElement {
            rule: self.grammar.rule_name(rule).to_owned(),
            value: span.text(input).into_owned(),
            children,
        }
    }
}
