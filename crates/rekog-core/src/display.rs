//! ABNF-like rendering of compiled rules.

use std::fmt::Write;

use crate::grammar::Grammar;
use crate::recognizer::{NodeId, Recognizer, RuleId};

impl Grammar {
    /// Renders `name = definition` for a defined rule, `None` otherwise.
    pub fn render_rule(&self, id: RuleId) -> Option<String> {
        let root = self.rule_root(id)?;
        let mut out = String::new();
        write!(out, "{} = ", self.rule_name(id)).ok()?;
        self.render_node(root, &mut out);
        Some(out)
    }

    /// Renders every defined rule, one per line, in definition order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (id, _, _) in self.rules() {
            if let Some(line) = self.render_rule(id) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    fn render_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Recognizer::Literal {
                bytes,
                case_insensitive,
            } => render_literal(bytes, *case_insensitive, out),
            &Recognizer::CharRange { lo, hi } => {
                if lo == hi {
                    let _ = write!(out, "%x{lo:02X}");
                } else {
                    let _ = write!(out, "%x{lo:02X}-{hi:02X}");
                }
            }
            Recognizer::Sequence(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    self.render_operand(child, out, true);
                }
            }
            Recognizer::Choice(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" / ");
                    }
                    self.render_operand(child, out, false);
                }
            }
            &Recognizer::Repetition { child, min, max } => {
                if (min, max) == (0, Some(1)) {
                    out.push('[');
                    self.render_node(child, out);
                    out.push(']');
                    return;
                }
                match (min, max) {
                    (0, None) => out.push('*'),
                    (n, None) => {
                        let _ = write!(out, "{n}*");
                    }
                    (n, Some(m)) if n == m => {
                        let _ = write!(out, "{n}");
                    }
                    (0, Some(m)) => {
                        let _ = write!(out, "*{m}");
                    }
                    (n, Some(m)) => {
                        let _ = write!(out, "{n}*{m}");
                    }
                }
                self.render_operand(child, out, true);
            }
            &Recognizer::RuleRef(rule) => out.push_str(self.rule_name(rule)),
            &Recognizer::Fold(child) => {
                out.push('(');
                self.render_node(child, out);
                out.push(')');
            }
        }
    }

    /// Parenthesizes operands that would otherwise bind differently.
    fn render_operand(&self, id: NodeId, out: &mut String, tight: bool) {
        let needs_parens = match self.node(id) {
            Recognizer::Choice(_) => true,
            Recognizer::Sequence(_) => tight,
            _ => false,
        };
        if needs_parens {
            out.push('(');
            self.render_node(id, out);
            out.push(')');
        } else {
            self.render_node(id, out);
        }
    }
}

fn render_literal(bytes: &[u8], case_insensitive: bool, out: &mut String) {
    let printable = bytes.iter().all(|&b| (0x20..=0x7E).contains(&b) && b != b'"');
    if printable {
        if !case_insensitive {
            out.push_str("%s");
        }
        out.push('"');
        // Printable ASCII only, so this is valid UTF-8.
        out.extend(bytes.iter().map(|&b| b as char));
        out.push('"');
        return;
    }

    out.push_str("%x");
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        let _ = write!(out, "{b:02X}");
    }
}
