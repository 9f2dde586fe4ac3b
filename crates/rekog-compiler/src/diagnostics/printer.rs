//! Rendering diagnostics against the ABNF source.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics as annotated source snippets with line and column.
///
/// Without a source the plain one-line [`Display`](std::fmt::Display) form
/// is used instead.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in the snippet header.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = self.format(&mut out);
        out
    }

    /// Writes the diagnostics in source order.
    ///
    /// Undefined references are reported after the whole rulelist is lowered,
    /// so emission order differs from document order.
    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return write!(w, "{}", self.diagnostics);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut ordered: Vec<&DiagnosticMessage> = self.diagnostics.iter().collect();
        ordered.sort_by_key(|diag| diag.range.start());

        for (i, diag) in ordered.into_iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&self.report(diag, source)))?;
        }
        Ok(())
    }

    fn report<'a>(&'a self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>> {
        let primary = char_span(diag.range, source);

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(primary.clone()).label(&diag.message));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(char_span(related.range, source))
                    .label(&related.message),
            );
        }

        let level = match diag.severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };
        let mut title = level.primary_title(&diag.message).element(snippet);
        for hint in &diag.hints {
            title = title.element(Level::HELP.message(hint));
        }

        let mut report = vec![title];
        // Fixes replace the annotated token, e.g. a duplicate `=` with `=/`.
        if let Some(fix) = &diag.fix {
            report.push(
                Level::HELP.secondary_title(&fix.description).element(
                    Snippet::source(source)
                        .line_start(1)
                        .patch(Patch::new(primary, &fix.replacement)),
                ),
            );
        }
        report
    }
}

/// Byte range for a diagnostic span. An empty span, such as "expected an
/// element" after `=`, is widened to the following character so it stays
/// visible; at the end of the source it stays empty.
fn char_span(range: TextRange, source: &str) -> Range<usize> {
    let start = usize::from(range.start()).min(source.len());
    let end = usize::from(range.end()).min(source.len());
    if start < end {
        return start..end;
    }
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + width
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
