//! Typed binding runtime.
//!
//! A [`Parser`] pairs a grammar with handlers that build user values.
//! Matching records the observed rules; the materializer then replays the
//! log bottom-up:
//!
//! - a rule with a handler creates its value on exit and applies the children
//!   delivered to it, in document order
//! - every finished rule delivers itself to the nearest enclosing rule with a
//!   handler, as a value if it has its own handler and as text otherwise
//! - deliveries without a matching collector are dropped

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rekog_core::{Grammar, RuleId, Span};

use crate::engine::{Event, Materializer, Matcher, NoopTracer, RuleEffect, Tracer, replay};

type ChildFn<T> = Box<dyn Fn(&mut T, T) + Send + Sync>;

enum Constructor<T> {
    Default(Box<dyn Fn() -> T + Send + Sync>),
    /// Receives the rule name and the matched text.
    Text(Box<dyn Fn(&str, &str) -> T + Send + Sync>),
}

enum Collector<T> {
    Text(Box<dyn Fn(&mut T, &str) + Send + Sync>),
    Int(Box<dyn Fn(&mut T, i64) + Send + Sync>),
    Child(ChildFn<T>),
}

struct Handler<T> {
    constructor: Constructor<T>,
    collectors: HashMap<RuleId, Collector<T>>,
    any_child: Option<ChildFn<T>>,
}

/// A finished rule on its way to the nearest handler above it.
struct Delivery<T> {
    rule: RuleId,
    span: Span,
    value: Option<T>,
}

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// Value built by the root rule's handler, if it has one.
    pub value: Option<T>,
    /// Bytes consumed from the start position. May be a strict prefix.
    pub span: Span,
}

/// Grammar plus handlers, producing values of type `T`.
///
/// Handlers are registered up front; parsing only borrows the parser, so a
/// configured parser can be shared across threads.
pub struct Parser<'g, T> {
    grammar: &'g Grammar,
    handlers: HashMap<RuleId, Handler<T>>,
    /// Rules whose matches are recorded, indexed by rule slot.
    observed: Vec<bool>,
}

impl<'g, T> Parser<'g, T> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            handlers: HashMap::new(),
            observed: vec![false; grammar.declared_count()],
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Builds a fresh value with `factory` whenever `rule` matches.
    ///
    /// # Panics
    /// Panics if `rule` is not defined in the grammar.
    #[track_caller]
    pub fn set_handler(
        &mut self,
        rule: &str,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> HandlerBuilder<'_, 'g, T> {
        self.install(rule, Constructor::Default(Box::new(factory)))
    }

    /// Like [`Parser::set_handler`], with the rule name and matched text
    /// passed to `factory`.
    ///
    /// # Panics
    /// Panics if `rule` is not defined in the grammar.
    #[track_caller]
    pub fn set_text_handler(
        &mut self,
        rule: &str,
        factory: impl Fn(&str, &str) -> T + Send + Sync + 'static,
    ) -> HandlerBuilder<'_, 'g, T> {
        self.install(rule, Constructor::Text(Box::new(factory)))
    }

    #[track_caller]
    fn install(&mut self, rule: &str, constructor: Constructor<T>) -> HandlerBuilder<'_, 'g, T> {
        let id = self.grammar.ensure_rule(rule);
        self.observed[id.index()] = true;

        let handler = match self.handlers.entry(id) {
            Entry::Occupied(entry) => {
                let handler = entry.into_mut();
                handler.constructor = constructor;
                handler
            }
            Entry::Vacant(entry) => entry.insert(Handler {
                constructor,
                collectors: HashMap::new(),
                any_child: None,
            }),
        };

        HandlerBuilder {
            grammar: self.grammar,
            observed: &mut self.observed,
            handler,
        }
    }

    pub fn parse_input(&self, rule: &str, input: &str) -> Option<Parsed<T>> {
        self.parse_input_at(rule, input, 0)
    }

    /// Matches `rule` against `input` starting at byte offset `start`.
    ///
    /// `None` means the rule does not match there.
    ///
    /// # Panics
    /// Panics if `rule` is not defined, or if matching reaches a rule that
    /// was referenced but never defined.
    pub fn parse_input_at(&self, rule: &str, input: &str, start: usize) -> Option<Parsed<T>> {
        self.parse_input_with_tracer(rule, input, start, &mut NoopTracer)
    }

    pub fn parse_input_with_tracer<R: Tracer>(
        &self,
        rule: &str,
        input: &str,
        start: usize,
        tracer: &mut R,
    ) -> Option<Parsed<T>> {
        let root = self.grammar.ensure_rule(rule);
        let bytes = input.as_bytes();
        let (end, effects) = Matcher::new(self.grammar, bytes, &self.observed, tracer).run(root, start)?;

        let value = BindingMaterializer { parser: self }.materialize(effects.as_slice(), bytes);
        Some(Parsed {
            value,
            span: Span::from_range(start..end),
        })
    }
}

/// Chains collector registrations onto one handler.
pub struct HandlerBuilder<'p, 'g, T> {
    grammar: &'g Grammar,
    observed: &'p mut [bool],
    handler: &'p mut Handler<T>,
}

impl<T> HandlerBuilder<'_, '_, T> {
    /// Passes the text of every `child` match to `collector`.
    ///
    /// # Panics
    /// Panics if `child` is not defined in the grammar.
    #[track_caller]
    pub fn set_collector(
        self,
        child: &str,
        collector: impl Fn(&mut T, &str) + Send + Sync + 'static,
    ) -> Self {
        self.collect(child, Collector::Text(Box::new(collector)))
    }

    /// Passes the leading integer of every `child` match to `collector`.
    /// Text without leading digits yields 0.
    #[track_caller]
    pub fn set_int_collector(
        self,
        child: &str,
        collector: impl Fn(&mut T, i64) + Send + Sync + 'static,
    ) -> Self {
        self.collect(child, Collector::Int(Box::new(collector)))
    }

    /// Passes the value built by `child`'s own handler to `collector`.
    /// Matches of a `child` without a handler are dropped.
    #[track_caller]
    pub fn set_child_collector(
        self,
        child: &str,
        collector: impl Fn(&mut T, T) + Send + Sync + 'static,
    ) -> Self {
        self.collect(child, Collector::Child(Box::new(collector)))
    }

    /// Receives values of handled children that have no collector of their own.
    pub fn set_any_child_collector(self, collector: impl Fn(&mut T, T) + Send + Sync + 'static) -> Self {
        self.handler.any_child = Some(Box::new(collector));
        self
    }

    #[track_caller]
    fn collect(self, child: &str, collector: Collector<T>) -> Self {
        let id = self.grammar.ensure_rule(child);
        self.observed[id.index()] = true;
        self.handler.collectors.insert(id, collector);
        self
    }
}

impl<T> Handler<T> {
    fn build(&self, rule_name: &str, text: &str, pending: Vec<Delivery<T>>, input: &[u8]) -> T {
        let mut value = match &self.constructor {
            Constructor::Default(factory) => factory(),
            Constructor::Text(factory) => factory(rule_name, text),
        };
        for delivery in pending {
            self.apply(&mut value, delivery, input);
        }
        value
    }

    fn apply(&self, target: &mut T, delivery: Delivery<T>, input: &[u8]) {
        match (self.collectors.get(&delivery.rule), delivery.value) {
            (Some(Collector::Text(collect)), _) => collect(target, &*delivery.span.text(input)),
            (Some(Collector::Int(collect)), _) => {
                collect(target, leading_int(&delivery.span.text(input)))
            }
            (Some(Collector::Child(collect)), Some(child)) => collect(target, child),
            (None, Some(child)) => {
                if let Some(collect) = &self.any_child {
                    collect(target, child);
                }
            }
            (Some(Collector::Child(_)), None) | (None, None) => {}
        }
    }
}

struct BindingMaterializer<'p, 'g, T> {
    parser: &'p Parser<'g, T>,
}

impl<T> Materializer for BindingMaterializer<'_, '_, T> {
    type Output = Option<T>;

    fn materialize(&self, effects: &[RuleEffect], input: &[u8]) -> Option<T> {
        // One list of pending deliveries per open rule.
        let mut stack: Vec<Vec<Delivery<T>>> = Vec::new();
        let mut root = None;

        replay(effects, |event| match event {
            Event::Open(_) => stack.push(Vec::new()),
            Event::Close(rule, span) => {
                let pending = stack.pop().unwrap_or_default();
                let (value, forwarded) = match self.parser.handlers.get(&rule) {
                    Some(handler) => {
                        let name = self.parser.grammar.rule_name(rule);
                        let text = span.text(input);
                        (Some(handler.build(name, &text, pending, input)), Vec::new())
                    }
                    None => (None, pending),
                };

                match stack.last_mut() {
                    Some(parent) => {
                        parent.push(Delivery { rule, span, value });
                        parent.extend(forwarded);
                    }
                    None => root = value,
                }
            }
        });

        root
    }
}

/// `atoi`-style parse: optional sign, then leading ASCII digits, saturating.
pub(crate) fn leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    if negative { -magnitude } else { magnitude }
}
