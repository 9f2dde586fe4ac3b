use std::path::{Path, PathBuf};

use rekog_lib::GrammarFile;

use super::source::{CompileOptions, compile_abnf, fail};

pub struct CompileArgs {
    pub abnf_path: PathBuf,
    pub output_path: PathBuf,
    pub options: CompileOptions,
}

pub fn run(args: CompileArgs) {
    if let Err(msg) = compile_to_file(&args.abnf_path, &args.output_path, args.options) {
        fail(msg);
    }
}

/// Compiles `abnf_path` on top of the core rules and saves the binary form.
///
/// Diagnostics are printed by [`compile_abnf`]; `Err` is the one-line summary.
pub fn compile_to_file(
    abnf_path: &Path,
    output_path: &Path,
    options: CompileOptions,
) -> Result<(), String> {
    let compilation = compile_abnf(abnf_path, options)?;
    compilation
        .grammar
        .save(output_path)
        .map_err(|e| format!("cannot write '{}': {}", output_path.display(), e))?;
    log::info!(
        "wrote {} rules to {}",
        compilation.grammar.rule_count(),
        output_path.display()
    );
    Ok(())
}
