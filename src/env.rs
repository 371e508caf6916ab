use std::collections::BTreeMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// The shell's view of its process environment.
///
/// A snapshot of the variables is taken once at startup and handed to every
/// spawned child; lookups never fall through to the live process
/// environment, so what the shell resolves against and what children
/// receive cannot drift apart. The working directory is tracked alongside
/// (`cd` is the only writer), together with the latched exit request that
/// tells the REPL to wind down.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    working_dir: PathBuf,
    exit_requested: bool,
}

impl Environment {
    /// Snapshot the current process: all environment variables plus the
    /// working directory.
    pub fn from_process() -> Self {
        Self {
            vars: stdenv::vars().collect(),
            working_dir: stdenv::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            exit_requested: false,
        }
    }

    /// An environment that inherits nothing from the process, rooted at
    /// `working_dir`. Variables must be added explicitly.
    pub fn bare(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            working_dir: working_dir.into(),
            exit_requested: false,
        }
    }

    /// Look up a variable in the snapshot.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable for this shell and its children.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The `HOME` value that a lone `~` expands to; empty when unset, which
    /// callers surface as an expansion failure.
    pub fn home(&self) -> &str {
        self.var("HOME").unwrap_or_default()
    }

    /// The raw `PATH` list used for executable lookup, if any.
    pub fn search_paths(&self) -> Option<&str> {
        self.var("PATH")
    }

    /// Variable pairs in a stable order, for spawning child processes.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Record the working directory after a successful chdir.
    pub fn set_working_dir(&mut self, dir: PathBuf) {
        self.working_dir = dir;
    }

    /// Ask the REPL to terminate after the current line.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// State that survives across prompt iterations: the environment plus the
/// lines submitted so far. There is exactly one of these per shell process,
/// owned by the REPL and threaded through every builtin.
#[derive(Debug)]
pub struct ShellState {
    pub env: Environment,
    /// Trimmed, non-empty command lines in submission order.
    pub history: Vec<String>,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            env: Environment::from_process(),
            history: Vec::new(),
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
