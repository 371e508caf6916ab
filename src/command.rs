pub use crate::builtin::BuiltinKind;

use crate::env::Environment;
use crate::external::find_in_path;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// The stdio triple a pipeline stage runs against.
///
/// Builtins write only to these streams, never directly to the terminal, so
/// they compose the same way external commands do when wired into a
/// pipeline or a redirection.
pub struct StageIo<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// A command name after resolution, ready for the executor to dispatch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Runs in-process.
    Builtin(BuiltinKind),
    /// Spawned as a child process from the resolved path.
    External(PathBuf),
}

/// Resolve a command name to something executable.
///
/// Builtins win by exact name match. A name containing a path separator is
/// handed to the OS verbatim; anything else is searched for along `PATH`.
/// `None` means the name could not be resolved.
pub fn resolve(name: &str, env: &Environment) -> Option<Command> {
    if let Some(kind) = BuiltinKind::lookup(name) {
        return Some(Command::Builtin(kind));
    }
    if name.contains('/') {
        return Some(Command::External(PathBuf::from(name)));
    }
    let search_paths = env.search_paths()?;
    find_in_path(OsStr::new(search_paths), OsStr::new(name)).map(Command::External)
}
