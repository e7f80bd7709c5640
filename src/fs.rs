//! Filesystem utilities
//!
//! Small helpers shared by the data-directory resolver and the log sinks.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Create a single directory, tolerating one that already exists
///
/// Returns `Ok(true)` when the directory was created and `Ok(false)` when it
/// was already there. Fails only if the path is missing afterwards or is
/// not a directory, which covers an existing directory inside a parent the
/// user cannot write to.
pub fn try_create_directory(path: &Path) -> io::Result<bool> {
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(_) if path.is_dir() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Atomically replace `dest` with `src`
pub fn rename_over(src: &Path, dest: &Path) -> io::Result<()> {
    fs::rename(src, dest)
}

/// Flush file data to stable storage
pub fn file_commit(file: &File) -> io::Result<()> {
    file.sync_data()
}

/// Make a path absolute against the current working directory
///
/// The path does not have to exist.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
