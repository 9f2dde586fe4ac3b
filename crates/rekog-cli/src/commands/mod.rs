pub mod check;
pub mod compile;
pub mod dump;
pub mod logging;
pub mod parse;
pub mod source;
