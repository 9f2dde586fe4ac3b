#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Binary grammar format.
//!
//! A grammar file is a 64-byte [`Header`], a string section shared by rule
//! names and literal bytes, a rule index listing names in definition
//! order, and one record per rule: the rule's name id followed by its
//! tagged node tree. All integers are big-endian.

mod constants;
mod emit;
mod error;
mod header;
mod module;
mod strings;
mod tag;


pub use constants::{HEADER_SIZE, MAGIC, MAX_DEPTH, VERSION};
pub use emit::emit;
pub use error::{Error, FormatError};
pub use header::Header;
pub use module::{Module, has_magic, load_bytes, read_file, write_file};
pub use strings::{StringTable, StringView};
pub use tag::Tag;
