//! Exit status codes for the binary
//!
//! - 0: Success
//! - 1: Any startup or runtime error

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    /// Bad data directory, malformed config file, I/O failure
    Error = 1,
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl<T, E> From<&Result<T, E>> for ExitStatus {
    fn from(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => ExitStatus::Success,
            Err(_) => ExitStatus::Error,
        }
    }
}
