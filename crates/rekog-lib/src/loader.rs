//! Process-wide grammar cache with an ordered search path.
//!
//! Names are resolved against application paths first (most recently added
//! wins), then the system paths taken from [`GRAMMAR_PATH_ENV`]. Absolute
//! names skip the search. A resolved file is decoded as a binary grammar
//! when it starts with the format magic and compiled as ABNF, on top of the
//! core rules, otherwise.

use std::collections::HashMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use once_cell::sync::Lazy;
use rekog_bytecode::{has_magic, load_bytes};
use rekog_compiler::{CompileError, Compiler};
use rekog_core::{Grammar, core_rules};

/// Environment variable holding the system search path, in the platform's
/// path-list syntax.
pub const GRAMMAR_PATH_ENV: &str = "REKOG_GRAMMAR_PATH";

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("grammar `{name}` not found (searched {} directories)", .searched.len())]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("cannot load `{}`: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: rekog_bytecode::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Search path plus a cache of loaded grammars, keyed by requested name.
#[derive(Debug, Default)]
pub struct GrammarLoader {
    app_paths: Vec<PathBuf>,
    system_paths: Vec<PathBuf>,
    cache: HashMap<String, Arc<Grammar>>,
}

impl GrammarLoader {
    /// A loader with no search paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader whose system paths come from [`GRAMMAR_PATH_ENV`].
    pub fn from_env() -> Self {
        let system_paths = env::var_os(GRAMMAR_PATH_ENV)
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();
        Self {
            system_paths,
            ..Self::default()
        }
    }

    /// Adds an application directory ahead of every existing one.
    pub fn add_path(&mut self, dir: impl Into<PathBuf>) {
        self.app_paths.insert(0, dir.into());
    }

    /// Forgets the application paths. System paths and the cache stay.
    pub fn clear_paths(&mut self) {
        self.app_paths.clear();
    }

    /// Drops every cached grammar. Handles already returned stay valid.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn search_paths(&self) -> impl Iterator<Item = &Path> {
        self.app_paths
            .iter()
            .chain(&self.system_paths)
            .map(PathBuf::as_path)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Resolves `name` to an existing file without loading it.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_owned());
        }
        self.search_paths()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Returns the cached grammar for `name`, loading it on first use.
    pub fn load(&mut self, name: &str) -> Result<Arc<Grammar>, LoaderError> {
        if let Some(grammar) = self.cache.get(name) {
            return Ok(Arc::clone(grammar));
        }

        let Some(path) = self.lookup(name) else {
            return Err(LoaderError::NotFound {
                name: name.to_owned(),
                searched: self.search_paths().map(Path::to_owned).collect(),
            });
        };
        log::info!("loading grammar `{name}` from {}", path.display());

        let started = Instant::now();
        let grammar = Arc::new(load_path(&path)?);
        log::debug!(
            "loaded grammar `{}` ({} rules) in {:?}",
            grammar.name(),
            grammar.rule_count(),
            started.elapsed()
        );

        self.cache.insert(name.to_owned(), Arc::clone(&grammar));
        Ok(grammar)
    }
}

/// Decodes or compiles one grammar file, bypassing any cache.
pub fn load_path(path: &Path) -> Result<Grammar, LoaderError> {
    let bytes = std::fs::read(path).map_err(|err| LoaderError::Load {
        path: path.to_owned(),
        source: err.into(),
    })?;
    if has_magic(&bytes) {
        return load_bytes(&bytes).map_err(|source| LoaderError::Load {
            path: path.to_owned(),
            source,
        });
    }

    let source = String::from_utf8(bytes).map_err(|err| CompileError::Io {
        path: path.to_owned(),
        source: io::Error::new(io::ErrorKind::InvalidData, err),
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grammar".to_owned());
    let core = core_rules();
    let compilation = Compiler::new(&source).name(name).base(&core).compile()?;
    Ok(compilation.grammar)
}

static LOADER: Lazy<Mutex<GrammarLoader>> = Lazy::new(|| Mutex::new(GrammarLoader::from_env()));

/// Locks the process-wide loader.
///
/// The lock is held for the whole of a load, so concurrent requests for one
/// name share a single grammar. A poisoned lock is recovered.
pub fn global_loader() -> MutexGuard<'static, GrammarLoader> {
    LOADER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads `name` through the process-wide loader.
pub fn load_grammar(name: &str) -> Result<Arc<Grammar>, LoaderError> {
    global_loader().load(name)
}

/// Adds an application directory to the process-wide loader.
pub fn add_grammar_path(dir: impl Into<PathBuf>) {
    global_loader().add_path(dir);
}
