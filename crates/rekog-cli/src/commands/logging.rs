//! stderr logger setup.

use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Environment variable consulted when no `-v` flag is given.
pub const LOG_ENV: &str = "RUST_LOG";

/// Installs the terminal logger. `-v` flags win over [`LOG_ENV`].
pub fn init(verbosity: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let level = level_for(verbosity, env.as_deref());
    let config = ConfigBuilder::new().set_time_format_custom(&[]).build();
    // Fails only if a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

pub fn level_for(verbosity: u8, env: Option<&str>) -> LevelFilter {
    match verbosity {
        0 => env
            .and_then(|value| LevelFilter::from_str(value.trim()).ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
