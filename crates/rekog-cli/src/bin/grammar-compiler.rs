//! `grammar-compiler <abnf-file> <output-file>`
//!
//! Compiles an ABNF grammar on top of the core rules and writes the binary
//! form. Exits with -1 on any failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, Command, value_parser};
use rekog_cli::cli::ColorChoice;
use rekog_cli::commands::compile::compile_to_file;
use rekog_cli::commands::logging;
use rekog_cli::commands::source::CompileOptions;

fn build_cli() -> Command {
    Command::new("grammar-compiler")
        .about("Compile an ABNF grammar into a binary grammar file")
        .arg(
            Arg::new("abnf_path")
                .value_name("ABNF")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("ABNF grammar file"),
        )
        .arg(
            Arg::new("output_path")
                .value_name("OUT")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Binary grammar file to write"),
        )
}

fn main() -> ExitCode {
    logging::init(0);

    let matches = build_cli().get_matches();
    let (Some(abnf_path), Some(output_path)) = (
        matches.get_one::<PathBuf>("abnf_path"),
        matches.get_one::<PathBuf>("output_path"),
    ) else {
        unreachable!("clap should have caught this");
    };

    let options = CompileOptions {
        color: ColorChoice::Auto.should_colorize(),
        ..CompileOptions::default()
    };
    match compile_to_file(abnf_path, output_path, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            // -1 as seen by the shell.
            ExitCode::from(255)
        }
    }
}
