//! Tracing infrastructure for debugging matches.
//!
//! The matcher is generic over its tracer. With [`NoopTracer`] every call is
//! an empty `#[inline(always)]` function and compiles away; no tracing state
//! lives in the matcher itself.

use std::fmt::Write;

use rekog_core::{Grammar, RuleId};

/// Instrumentation hooks, called for every rule reference the matcher
/// resolves (observed or not).
pub trait Tracer {
    /// Called before a rule starts matching at `pos`.
    fn trace_enter(&mut self, rule: RuleId, pos: usize);

    /// Called after a rule matched `start..end`.
    fn trace_exit(&mut self, rule: RuleId, start: usize, end: usize);

    /// Called when a rule failed to match at `pos`.
    fn trace_fail(&mut self, rule: RuleId, pos: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _rule: RuleId, _pos: usize) {}

    #[inline(always)]
    fn trace_exit(&mut self, _rule: RuleId, _start: usize, _end: usize) {}

    #[inline(always)]
    fn trace_fail(&mut self, _rule: RuleId, _pos: usize) {}
}

/// Tracer that collects one indented line per event.
///
/// ```text
/// > num @0
///   > digit @0
///   < digit 0..1
///   x digit @1
/// < num 0..1
/// ```
pub struct PrintTracer<'g> {
    grammar: &'g Grammar,
    lines: Vec<String>,
    depth: usize,
}

impl<'g> PrintTracer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push_line(&mut self, symbol: char, rule: RuleId, location: std::fmt::Arguments<'_>) {
        let mut line = "  ".repeat(self.depth);
        let _ = write!(line, "{symbol} {} {location}", self.grammar.rule_name(rule));
        self.lines.push(line);
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter(&mut self, rule: RuleId, pos: usize) {
        self.push_line('>', rule, format_args!("@{pos}"));
        self.depth += 1;
    }

    fn trace_exit(&mut self, rule: RuleId, start: usize, end: usize) {
        self.depth = self.depth.saturating_sub(1);
        self.push_line('<', rule, format_args!("{start}..{end}"));
    }

    fn trace_fail(&mut self, rule: RuleId, pos: usize) {
        self.depth = self.depth.saturating_sub(1);
        self.push_line('x', rule, format_args!("@{pos}"));
    }
}
