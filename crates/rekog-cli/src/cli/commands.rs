//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("rekog")
        .about("Compile ABNF grammars and match input against them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(compile_command())
        .subcommand(check_command())
        .subcommand(dump_command())
        .subcommand(parse_command())
}

/// Compile ABNF into a binary grammar.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile an ABNF grammar into a binary grammar file")
        .after_help(
            r#"EXAMPLES:
  rekog compile sip.abnf sip.grammar
  rekog compile partial.abnf partial.grammar --allow-incomplete"#,
        )
        .arg(abnf_path_arg())
        .arg(output_path_arg())
        .arg(allow_incomplete_arg())
        .arg(reject_overrides_arg())
        .arg(color_arg())
}

/// Validate an ABNF grammar.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Compile an ABNF grammar and report diagnostics")
        .after_help(
            r#"EXAMPLES:
  rekog check sip.abnf
  rekog check sip.abnf --strict"#,
        )
        .arg(abnf_path_arg())
        .arg(strict_arg())
        .arg(allow_incomplete_arg())
        .arg(reject_overrides_arg())
        .arg(color_arg())
}

/// Print the rules of a grammar.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Print the rules of an ABNF or binary grammar")
        .after_help(
            r#"EXAMPLES:
  rekog dump sip.abnf
  rekog dump sip.grammar              # also prints header info"#,
        )
        .arg(grammar_path_arg())
        .arg(color_arg())
}

/// Match input against a rule.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Match input against a rule and print the parse tree")
        .override_usage(
            "\
  rekog parse <GRAMMAR> <RULE> <FILE>
  rekog parse <GRAMMAR> <RULE> -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  rekog parse sip.grammar sip-message register.txt
  rekog parse sip.abnf SIP-URI -s 'sip:alice@example.com'
  rekog parse sip.abnf SIP-URI -s 'sip:alice@example.com' --observe user,host --json
  rekog parse num.abnf num -s '12a' --trace"#,
        )
        .arg(grammar_path_arg())
        .arg(rule_arg())
        .arg(input_path_arg())
        .arg(input_text_arg())
        .arg(json_arg())
        .arg(observe_arg())
        .arg(trace_arg())
        .arg(full_arg())
        .arg(color_arg())
}
