//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror the command `*Args` but are populated from clap
//! - `Into<*Args>` impls bridge dispatch to command handlers

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::parse::{Input, ParseArgs};
use crate::commands::source::CompileOptions;

pub struct CompileParams {
    pub abnf_path: PathBuf,
    pub output_path: PathBuf,
    pub allow_incomplete: bool,
    pub reject_overrides: bool,
    pub color: ColorChoice,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            abnf_path: required_path(m, "abnf_path"),
            output_path: required_path(m, "output_path"),
            allow_incomplete: m.get_flag("allow_incomplete"),
            reject_overrides: m.get_flag("reject_overrides"),
            color: parse_color(m),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            abnf_path: p.abnf_path,
            output_path: p.output_path,
            options: CompileOptions {
                allow_incomplete: p.allow_incomplete,
                reject_overrides: p.reject_overrides,
                color: p.color.should_colorize(),
            },
        }
    }
}

pub struct CheckParams {
    pub abnf_path: PathBuf,
    pub strict: bool,
    pub allow_incomplete: bool,
    pub reject_overrides: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            abnf_path: required_path(m, "abnf_path"),
            strict: m.get_flag("strict"),
            allow_incomplete: m.get_flag("allow_incomplete"),
            reject_overrides: m.get_flag("reject_overrides"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            abnf_path: p.abnf_path,
            strict: p.strict,
            options: CompileOptions {
                allow_incomplete: p.allow_incomplete,
                reject_overrides: p.reject_overrides,
                color: p.color.should_colorize(),
            },
        }
    }
}

pub struct DumpParams {
    pub grammar_path: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: required_path(m, "grammar_path"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ParseParams {
    pub grammar_path: PathBuf,
    pub rule: String,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub json: bool,
    pub observe: Vec<String>,
    pub trace: bool,
    pub full: bool,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: required_path(m, "grammar_path"),
            rule: m.get_one::<String>("rule").cloned().unwrap_or_default(),
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),
            json: m.get_flag("json"),
            observe: m
                .get_many::<String>("observe")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            trace: m.get_flag("trace"),
            full: m.get_flag("full"),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        let input = match (p.input_text, p.input_path) {
            (Some(text), _) => Input::Text(text),
            (None, Some(path)) if path.as_os_str() == "-" => Input::Stdin,
            (None, Some(path)) => Input::File(path),
            (None, None) => Input::Stdin,
        };
        Self {
            grammar_path: p.grammar_path,
            rule: p.rule,
            input,
            json: p.json,
            observe: p.observe,
            trace: p.trace,
            full: p.full,
            color: p.color.should_colorize(),
        }
    }
}

/// Required positionals are enforced by clap before dispatch.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
