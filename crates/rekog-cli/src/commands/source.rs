//! Loading grammars for the commands: ABNF compiled with the core rules,
//! or binary grammar files detected by their magic.

use std::path::Path;

use rekog_lib::bytecode::{self, has_magic};
use rekog_lib::{Compilation, CompileError, Compiler, Grammar, core_rules};

#[derive(Clone, Copy, Debug, Default)]
pub struct CompileOptions {
    pub allow_incomplete: bool,
    pub reject_overrides: bool,
    pub color: bool,
}

/// A grammar and, for binaries, the header it was read with.
pub struct LoadedGrammar {
    pub grammar: Grammar,
    pub header: Option<bytecode::Header>,
}

/// Compiles an ABNF file.
///
/// Diagnostics (warnings included) are printed to stderr. `Err` carries a
/// one-line message for failures that have no diagnostics of their own.
pub fn compile_abnf(path: &Path, options: CompileOptions) -> Result<Compilation, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    compile_source(path, &source, options)
}

fn compile_source(path: &Path, source: &str, options: CompileOptions) -> Result<Compilation, String> {
    let core = core_rules();
    let result = Compiler::new(source)
        .name(grammar_name(path))
        .base(&core)
        .reject_base_overrides(options.reject_overrides)
        .allow_incomplete(options.allow_incomplete)
        .compile();

    let display_path = path.display().to_string();
    match result {
        Ok(compilation) => {
            if !compilation.diagnostics.is_empty() {
                eprint!(
                    "{}",
                    compilation
                        .diagnostics
                        .printer()
                        .source(source)
                        .path(&display_path)
                        .colored(options.color)
                        .render()
                );
            }
            Ok(compilation)
        }
        Err(CompileError::Invalid(diagnostics)) => {
            eprint!(
                "{}",
                diagnostics
                    .printer()
                    .source(source)
                    .path(&display_path)
                    .colored(options.color)
                    .render()
            );
            Err(format!(
                "could not compile '{}' ({} errors)",
                display_path,
                diagnostics.error_count()
            ))
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Loads a binary grammar or compiles ABNF, whichever the file holds.
pub fn load_grammar(path: &Path, color: bool) -> Result<LoadedGrammar, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;

    if has_magic(&bytes) {
        let module = bytecode::Module::from_bytes(&bytes)
            .map_err(|e| format!("invalid grammar file '{}': {}", path.display(), e))?;
        let grammar = module
            .decode()
            .map_err(|e| format!("invalid grammar file '{}': {}", path.display(), e))?;
        return Ok(LoadedGrammar {
            grammar,
            header: Some(*module.header()),
        });
    }

    let source = String::from_utf8(bytes)
        .map_err(|_| format!("'{}' is neither a grammar file nor UTF-8 text", path.display()))?;
    let options = CompileOptions {
        color,
        ..CompileOptions::default()
    };
    let compilation = compile_source(path, &source, options)?;
    Ok(LoadedGrammar {
        grammar: compilation.grammar,
        header: None,
    })
}

fn grammar_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grammar".to_owned())
}

/// Prints `error: {msg}` and exits with status 1.
pub fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}
