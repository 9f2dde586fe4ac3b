use rekog_cli::cli::{CheckParams, CompileParams, DumpParams, ParseParams, build_cli};
use rekog_cli::commands;

fn main() {
    let matches = build_cli().get_matches();
    commands::logging::init(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("compile", m)) => {
            let params = CompileParams::from_matches(m);
            commands::compile::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
