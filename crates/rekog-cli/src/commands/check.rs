use std::path::PathBuf;

use super::source::{CompileOptions, compile_abnf, fail};

pub struct CheckArgs {
    pub abnf_path: PathBuf,
    pub strict: bool,
    pub options: CompileOptions,
}

pub fn run(args: CheckArgs) {
    let compilation = compile_abnf(&args.abnf_path, args.options).unwrap_or_else(|msg| fail(msg));

    if args.strict && compilation.diagnostics.has_warnings() {
        fail(format_args!(
            "{} warnings treated as errors",
            compilation.diagnostics.warning_count()
        ));
    }

    // Silent on success (like cargo check)
}
