//! Error types for nodecfg
//!
//! Only path resolution, config syntax and version casting surface as
//! errors. The logging path never returns one: it degrades silently.

use thiserror::Error;

/// Main error type for nodecfg
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    FileSystem(String),

    #[error("Config syntax error at line {line}: {message}")]
    ConfigSyntax {
        line: usize,
        message: String,
    },

    #[error("Version format error: {0}")]
    VersionFormat(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;
