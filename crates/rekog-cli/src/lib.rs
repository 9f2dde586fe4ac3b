//! Command-line front end shared by the `rekog` and `grammar-compiler` binaries.

pub mod cli;
pub mod commands;
