use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Search `PATH` for an executable with the given name.
///
/// `search_paths` is split on the platform list separator; directories are
/// tried in order and the first candidate that is a regular file with an
/// execute bit set wins. Empty segments are joined as-is, which makes them
/// behave like the current directory.
pub fn find_in_path(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// A regular file with any execute permission bit set.
#[cfg(unix)]
pub(crate) fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub(crate) fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}
