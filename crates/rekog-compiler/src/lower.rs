//! CST → recognizer graph.
//!
//! Lowering always builds a fresh [`Grammar`]. It keeps going after an
//! error so one pass reports as much as possible; the caller discards the
//! grammar whenever an error was emitted.

use std::collections::HashMap;

use indexmap::IndexMap;
use rekog_core::{BYTE_LIMIT, Grammar, MAX_CODE_POINT, NodeId, Recognizer};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics, Severity};
use crate::parser::{
    Alternation, Concatenation, Expr, Num, Repeat, RepeatOp, Repetition, Root, Rule, Str,
    SyntaxToken,
};

pub(crate) struct LowerOptions<'a> {
    pub name: &'a str,
    pub base: Option<&'a Grammar>,
    pub reject_base_overrides: bool,
    pub allow_incomplete: bool,
}

pub(crate) struct Lowering<'a, 'd> {
    options: LowerOptions<'a>,
    diagnostics: &'d mut Diagnostics,
    grammar: Grammar,
    /// Name token range of the first `=` definition, by lowercased name.
    defined: HashMap<String, TextRange>,
    /// First reference site, by lowercased name.
    references: IndexMap<String, TextRange>,
    /// `=/` alternatives for rules only the base defines.
    base_extensions: Vec<(String, NodeId, TextRange)>,
    ows: Option<NodeId>,
}

impl<'a, 'd> Lowering<'a, 'd> {
    pub fn new(options: LowerOptions<'a>, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            grammar: Grammar::new(options.name),
            options,
            diagnostics,
            defined: HashMap::new(),
            references: IndexMap::new(),
            base_extensions: Vec::new(),
            ows: None,
        }
    }

    pub fn lower(mut self, root: &Root) -> Grammar {
        // Declaring up front keeps rules in document order, whatever the
        // order of references.
        for rule in root.rules() {
            if let Some(name) = rule.name() {
                self.grammar.declare_rule(name.text());
            }
        }

        for rule in root.rules() {
            self.lower_rule(&rule);
        }

        if let Some(base) = self.options.base {
            self.grammar.include(base);
        }
        self.extend_base_rules();

        self.check_references();
        self.grammar
    }

    fn lower_rule(&mut self, rule: &Rule) {
        let (Some(name), Some(defined_as), Some(body)) =
            (rule.name(), rule.defined_as(), rule.body())
        else {
            // already reported by the parser
            return;
        };
        let text = name.text().to_owned();
        let key = text.to_ascii_lowercase();
        let node = self.lower_expr(&body);

        if rule.is_incremental() {
            if self.defined.contains_key(&key) {
                if self.grammar.extend_rule(&text, node).is_err() {
                    self.incremental_undefined(&text, name.text_range());
                }
            } else if self.base_defines(&text) {
                self.base_extensions.push((text, node, name.text_range()));
            } else {
                self.incremental_undefined(&text, name.text_range());
            }
            return;
        }

        if let Some(&first) = self.defined.get(&key) {
            self.diagnostics
                .report(DiagnosticKind::DuplicateDefinition, defined_as.text_range())
                .message(&text)
                .related_to("first defined here", first)
                .fix("use `=/` to add alternatives", "=/")
                .emit();
            return;
        }

        if self.base_defines(&text) {
            if self.options.reject_base_overrides {
                self.diagnostics
                    .report(DiagnosticKind::BaseRuleOverride, name.text_range())
                    .message(&text)
                    .emit();
            } else {
                log::debug!("grammar `{}`: `{}` shadows a base rule", self.options.name, text);
            }
        }

        self.defined.insert(key, name.text_range());
        self.grammar.add_rule(&text, node);
    }

    fn base_defines(&self, name: &str) -> bool {
        self.options.base.is_some_and(|base| base.rule(name).is_ok())
    }

    fn incremental_undefined(&mut self, name: &str, range: TextRange) {
        self.diagnostics
            .report(DiagnosticKind::IncrementalUndefined, range)
            .message(name)
            .emit();
    }

    /// Appends deferred `=/` alternatives once the base rules are copied in.
    /// A later local `=` for the same name still counts as `=` after `=/`.
    fn extend_base_rules(&mut self) {
        for (name, node, range) in std::mem::take(&mut self.base_extensions) {
            let key = name.to_ascii_lowercase();
            if self.defined.contains_key(&key) || self.grammar.extend_rule(&name, node).is_err() {
                self.incremental_undefined(&name, range);
            }
        }
    }

    fn check_references(&mut self) {
        let undefined: Vec<String> = self
            .grammar
            .undefined_rules()
            .map(str::to_owned)
            .collect();

        for name in undefined {
            let key = name.to_ascii_lowercase();
            let Some(&range) = self.references.get(&key) else {
                continue;
            };
            let severity = if self.options.allow_incomplete {
                log::warn!(
                    "grammar `{}`: `{}` is referenced but not defined",
                    self.options.name,
                    name
                );
                Severity::Warning
            } else {
                Severity::Error
            };
            self.diagnostics
                .report(DiagnosticKind::UndefinedReference, range)
                .message(&name)
                .severity(severity)
                .emit();
        }
    }

    fn add(&mut self, recognizer: Recognizer) -> NodeId {
        self.grammar.add_node(recognizer)
    }

    /// Stand-in for a node whose diagnostic was already emitted.
    fn placeholder(&mut self) -> NodeId {
        self.add(Recognizer::literal("", false))
    }

    fn lower_expr(&mut self, expr: &Expr) -> NodeId {
        match expr {
            Expr::Alternation(alt) => self.lower_alternation(alt),
            Expr::Concatenation(concat) => self.lower_concatenation(concat),
            Expr::Repetition(rep) => self.lower_repetition(rep),
            Expr::Ref(r) => match r.name() {
                Some(name) => self.reference(&name),
                None => self.placeholder(),
            },
            Expr::Str(s) => self.lower_str(s),
            Expr::Num(n) => self.lower_num(n),
            Expr::Prose(p) => {
                let detail = p.token().map(|t| t.text().to_owned()).unwrap_or_default();
                self.diagnostics
                    .report(DiagnosticKind::ProseUnsupported, p.text_range())
                    .message(format!("`{detail}`"))
                    .emit();
                self.placeholder()
            }
            Expr::Group(group) => match group.body() {
                Some(body @ (Expr::Alternation(_) | Expr::Concatenation(_))) => {
                    let inner = self.lower_expr(&body);
                    self.add(Recognizer::Fold(inner))
                }
                Some(body) => self.lower_expr(&body),
                None => self.placeholder(),
            },
            Expr::Optional(opt) => {
                let inner = match opt.body() {
                    Some(body) => self.lower_expr(&body),
                    None => self.placeholder(),
                };
                self.add(Recognizer::optional(inner))
            }
        }
    }

    fn lower_alternation(&mut self, alt: &Alternation) -> NodeId {
        let branches: Vec<NodeId> = alt.branches().map(|b| self.lower_expr(&b)).collect();
        match branches.as_slice() {
            [single] => *single,
            _ => self.add(Recognizer::Choice(branches.into())),
        }
    }

    fn lower_concatenation(&mut self, concat: &Concatenation) -> NodeId {
        let items: Vec<NodeId> = concat.items().map(|i| self.lower_expr(&i)).collect();
        match items.as_slice() {
            [single] => *single,
            _ => self.add(Recognizer::Sequence(items.into())),
        }
    }

    fn reference(&mut self, name: &SyntaxToken) -> NodeId {
        let text = name.text();
        self.references
            .entry(text.to_ascii_lowercase())
            .or_insert(name.text_range());
        self.grammar.rule_ref(text)
    }

    fn lower_repetition(&mut self, rep: &Repetition) -> NodeId {
        let element = match rep.element() {
            Some(element) => self.lower_expr(&element),
            None => return self.placeholder(),
        };
        let Some(repeat) = rep.repeat() else {
            return element;
        };
        let Some((min, max)) = self.repeat_bounds(&repeat) else {
            return element;
        };

        match repeat.op() {
            RepeatOp::List => self.lower_list(element, min, max),
            _ if (min, max) == (1, Some(1)) => element,
            _ => self.add(Recognizer::Repetition {
                child: element,
                min,
                max,
            }),
        }
    }

    /// `None` when a diagnostic was emitted.
    fn repeat_bounds(&mut self, repeat: &Repeat) -> Option<(u32, Option<u32>)> {
        let min = match repeat.min() {
            Some(token) => Some(self.count(&token)?),
            None => None,
        };
        let max = match repeat.max() {
            Some(token) => Some(self.count(&token)?),
            None => None,
        };

        let (min, max) = match repeat.op() {
            RepeatOp::Exact => {
                let n = min.unwrap_or(1);
                (n, Some(n))
            }
            RepeatOp::Range | RepeatOp::List => (min.unwrap_or(0), max),
        };

        if let Some(max) = max
            && max < min
        {
            self.diagnostics
                .report(DiagnosticKind::InvalidRepeat, repeat.text_range())
                .message(format!("{min} > {max}"))
                .emit();
            return None;
        }
        Some((min, max))
    }

    fn count(&mut self, token: &SyntaxToken) -> Option<u32> {
        match token.text().parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.diagnostics
                    .report(DiagnosticKind::InvalidNumber, token.text_range())
                    .message(format!("repeat count `{}` is too large", token.text()))
                    .emit();
                None
            }
        }
    }

    /// `n#m element` = `element *( OWS "," OWS element )`, with `n = 0`
    /// making the whole list optional.
    fn lower_list(&mut self, element: NodeId, min: u32, max: Option<u32>) -> NodeId {
        if max == Some(0) {
            return self.add(Recognizer::literal("", false));
        }

        let ows = self.ows();
        let comma = self.add(Recognizer::literal(",", true));
        let item = self.add(Recognizer::Sequence(Box::new([ows, comma, ows, element])));
        let item = self.add(Recognizer::Fold(item));
        let tail = self.add(Recognizer::Repetition {
            child: item,
            min: min.saturating_sub(1),
            max: max.map(|m| m - 1),
        });
        let list = self.add(Recognizer::Sequence(Box::new([element, tail])));

        if min == 0 {
            self.add(Recognizer::optional(list))
        } else {
            list
        }
    }

    /// `OWS = *( SP / HTAB )`, built inline so lists work without a base.
    fn ows(&mut self) -> NodeId {
        if let Some(ows) = self.ows {
            return ows;
        }
        let sp = self.add(Recognizer::char(0x20));
        let htab = self.add(Recognizer::char(0x09));
        let either = self.add(Recognizer::Choice(Box::new([sp, htab])));
        let ows = self.add(Recognizer::Repetition {
            child: either,
            min: 0,
            max: None,
        });
        self.ows = Some(ows);
        ows
    }

    fn lower_str(&mut self, s: &Str) -> NodeId {
        let Some(token) = s.token() else {
            return self.placeholder();
        };
        let text = token.text();
        let (case_sensitive, quoted) = match text.strip_prefix('%') {
            Some(rest) => (rest.starts_with(['s', 'S']), &rest[1..]),
            None => (false, text),
        };
        let content = &quoted[1..quoted.len() - 1];
        self.add(Recognizer::literal(content, !case_sensitive))
    }

    fn lower_num(&mut self, n: &Num) -> NodeId {
        let Some(token) = n.token() else {
            return self.placeholder();
        };
        match parse_num_val(token.text()) {
            Ok(recognizer) => self.add(recognizer),
            Err(kind) => {
                self.diagnostics
                    .report(kind, token.text_range())
                    .message(format!("`{}`", token.text()))
                    .emit();
                self.placeholder()
            }
        }
    }
}

/// Lowers `%b`/`%d`/`%x` values: singletons and ranges become
/// `CharRange`, dot sequences a case-sensitive `Literal`.
pub(crate) fn parse_num_val(text: &str) -> Result<Recognizer, DiagnosticKind> {
    let radix = match text.as_bytes().get(1).map(u8::to_ascii_lowercase) {
        Some(b'b') => 2,
        Some(b'd') => 10,
        Some(b'x') => 16,
        _ => return Err(DiagnosticKind::InvalidNumber),
    };
    let body = &text[2..];
    let value = |digits: &str| -> Result<u32, DiagnosticKind> {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(DiagnosticKind::InvalidNumber);
        }
        let value =
            u32::from_str_radix(digits, radix).map_err(|_| DiagnosticKind::CodePointTooLarge)?;
        if value > MAX_CODE_POINT {
            return Err(DiagnosticKind::CodePointTooLarge);
        }
        Ok(value)
    };

    if let Some((lo, hi)) = body.split_once('-') {
        if hi.contains('-') || body.contains('.') {
            return Err(DiagnosticKind::InvalidNumber);
        }
        let (lo, hi) = (value(lo)?, value(hi)?);
        if lo > hi {
            return Err(DiagnosticKind::InvalidRange);
        }
        return Ok(Recognizer::range(lo, hi));
    }

    if body.contains('.') {
        let values = body.split('.').map(value).collect::<Result<Vec<_>, _>>()?;
        let bytes: Vec<u8> = if values.iter().all(|&v| v < BYTE_LIMIT) {
            values.iter().map(|&v| v as u8).collect()
        } else {
            let text = values
                .iter()
                .map(|&v| char::from_u32(v).ok_or(DiagnosticKind::InvalidNumber))
                .collect::<Result<String, _>>()?;
            text.into_bytes()
        };
        return Ok(Recognizer::Literal {
            bytes: bytes.into(),
            case_insensitive: false,
        });
    }

    Ok(Recognizer::char(value(body)?))
}
