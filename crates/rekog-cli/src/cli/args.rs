//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be
//! composed into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// ABNF source file (positional).
pub fn abnf_path_arg() -> Arg {
    Arg::new("abnf_path")
        .value_name("ABNF")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("ABNF grammar file")
}

/// Binary grammar output file (positional).
pub fn output_path_arg() -> Arg {
    Arg::new("output_path")
        .value_name("OUT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Binary grammar file to write")
}

/// ABNF or binary grammar file (positional).
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("ABNF or binary grammar file")
}

/// Rule to match (positional).
pub fn rule_arg() -> Arg {
    Arg::new("rule")
        .value_name("RULE")
        .required(true)
        .help("Root rule to match")
}

/// Input file (positional).
pub fn input_path_arg() -> Arg {
    Arg::new("input_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Input file (use \"-\" for stdin)")
}

/// Inline input text (-s/--source).
pub fn input_text_arg() -> Arg {
    Arg::new("input_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .conflicts_with("input_path")
        .help("Inline input text")
}

/// Downgrade undefined rules to warnings (--allow-incomplete).
pub fn allow_incomplete_arg() -> Arg {
    Arg::new("allow_incomplete")
        .long("allow-incomplete")
        .action(ArgAction::SetTrue)
        .help("Accept references to rules that are never defined")
}

/// Refuse local rules that shadow core rules (--reject-overrides).
pub fn reject_overrides_arg() -> Arg {
    Arg::new("reject_overrides")
        .long("reject-overrides")
        .action(ArgAction::SetTrue)
        .help("Report grammar rules that redefine core rules as errors")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// JSON tree output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the parse tree as JSON")
}

/// Restrict the tree to some rules (--observe).
pub fn observe_arg() -> Arg {
    Arg::new("observe")
        .long("observe")
        .value_name("RULES")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .help("Only build tree nodes for these rules (comma-separated)")
}

/// Rule trace (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Print every rule entered, matched and failed")
}

/// Require the whole input to match (--full).
pub fn full_arg() -> Arg {
    Arg::new("full")
        .long("full")
        .action(ArgAction::SetTrue)
        .help("Fail unless the rule consumes the whole input")
}

/// Log verbosity (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Increase log verbosity (-v info, -vv debug)")
}
