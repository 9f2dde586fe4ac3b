//! Saving and loading compiled grammars.

use std::path::Path;

use rekog_bytecode::{Error, read_file, write_file};
use rekog_core::Grammar;

/// Binary persistence for [`Grammar`].
///
/// Files use the format described in [`rekog_bytecode`]; the conventional
/// extension is `.grammar`.
pub trait GrammarFile: Sized {
    /// Writes the grammar to `path`. Incomplete grammars are refused.
    fn save(&self, path: impl AsRef<Path>) -> Result<(), Error>;

    /// Reads a grammar written by [`GrammarFile::save`].
    fn load(path: impl AsRef<Path>) -> Result<Self, Error>;
}

impl GrammarFile for Grammar {
    fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        write_file(self, path)
    }

    fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        read_file(path)
    }
}
