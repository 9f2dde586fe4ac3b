//! Compiler builder: ABNF text in, optimized [`Grammar`] out.

use std::io;
use std::path::{Path, PathBuf};

use rekog_core::Grammar;

use crate::diagnostics::Diagnostics;
use crate::lower::{LowerOptions, Lowering};
use crate::parser::{self, DEFAULT_RECURSION_LIMIT, Parser, lexer::lex};

/// Errors that can occur while compiling ABNF.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("ABNF compilation failed with {} errors", .0.error_count())]
    Invalid(Diagnostics),

    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            CompileError::Invalid(diagnostics) => Some(diagnostics),
            CompileError::Io { .. } => None,
        }
    }
}

/// A successfully compiled grammar and the warnings produced on the way.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub grammar: Grammar,
    pub diagnostics: Diagnostics,
}

/// Builder for compiling ABNF source.
///
/// ```ignore
/// let core = rekog_core::core_rules();
/// let compiled = Compiler::new("num = 1*DIGIT\n")
///     .name("numbers")
///     .base(&core)
///     .compile()?;
/// ```
#[derive(Debug, Clone)]
pub struct Compiler<'a> {
    source: &'a str,
    name: String,
    base: Option<&'a Grammar>,
    reject_base_overrides: bool,
    allow_incomplete: bool,
    recursion_limit: u32,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            name: "grammar".to_owned(),
            base: None,
            reject_base_overrides: false,
            allow_incomplete: false,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Grammar whose rules fill in names this source does not define.
    pub fn base(mut self, base: &'a Grammar) -> Self {
        self.base = Some(base);
        self
    }

    /// Report local rules that shadow base rules as errors.
    ///
    /// By default a local definition silently replaces the base one.
    pub fn reject_base_overrides(mut self, reject: bool) -> Self {
        self.reject_base_overrides = reject;
        self
    }

    /// Downgrade undefined references to warnings.
    pub fn allow_incomplete(mut self, allow: bool) -> Self {
        self.allow_incomplete = allow;
        self
    }

    /// Maximum nesting of groups and options.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn compile(self) -> Result<Compilation, CompileError> {
        let parser = Parser::new(self.source, lex(self.source))
            .with_recursion_limit(self.recursion_limit);
        let (parse, mut diagnostics) = parser::parse_with_parser(parser);
        if diagnostics.has_errors() {
            return Err(CompileError::Invalid(diagnostics));
        }

        let options = LowerOptions {
            name: &self.name,
            base: self.base,
            reject_base_overrides: self.reject_base_overrides,
            allow_incomplete: self.allow_incomplete,
        };
        let mut grammar = Lowering::new(options, &mut diagnostics).lower(&parse.root());
        if diagnostics.has_errors() {
            return Err(CompileError::Invalid(diagnostics));
        }

        log::debug!(
            "compiled grammar `{}`: {} rules, {} nodes, complete: {}",
            grammar.name(),
            grammar.rule_count(),
            grammar.node_count(),
            grammar.is_complete()
        );
        grammar.optimize();

        Ok(Compilation {
            grammar,
            diagnostics,
        })
    }
}

/// Reads and compiles an ABNF file, naming the grammar after the file stem.
pub fn compile_file(
    path: impl AsRef<Path>,
    base: Option<&Grammar>,
) -> Result<Compilation, CompileError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_owned(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grammar".to_owned());

    let mut compiler = Compiler::new(&source).name(name);
    if let Some(base) = base {
        compiler = compiler.base(base);
    }
    compiler.compile()
}
