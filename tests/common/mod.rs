//! Common test utilities for nodecfg integration tests
//!
//! This module provides shared test infrastructure including:
//! - Scratch data directories
//! - CLI invocation helpers
//! - Log file readers

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Exit status codes matching the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: ExitStatus,
    pub exit_code: i32,
}

impl CliResponse {
    /// Check if stdout contains a substring
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    /// `key=value` lines printed by `-printsettings`
    pub fn settings_lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| l.starts_with('-')).collect()
    }
}

/// Scratch data directory for one test
pub struct TestDataDir {
    pub dir: TempDir,
}

impl Default for TestDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp data dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `-datadir=<path>` token pointing here
    pub fn arg(&self) -> String {
        format!("-datadir={}", self.path().display())
    }

    /// Write `content` to `name` inside the data directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the default config file
    pub fn write_conf(&self, content: &str) -> PathBuf {
        self.write("nodecfg.conf", content)
    }

    /// Contents of a file in the data directory, empty if absent
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap_or_default()
    }

    /// Command-line tokens: the `-datadir` token followed by `extra`
    pub fn tokens(&self, extra: &[&str]) -> Vec<String> {
        let mut tokens = vec![self.arg()];
        tokens.extend(extra.iter().map(|t| t.to_string()));
        tokens
    }
}

/// Run the CLI with the given arguments (program name excluded)
pub fn nodecfg(args: &[&str]) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nodecfg"));
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to run nodecfg");
    parse_output(output)
}

/// Run the CLI against a scratch data directory
pub fn nodecfg_in(data: &TestDataDir, args: &[&str]) -> CliResponse {
    let tokens = data.tokens(args);
    let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
    nodecfg(&refs)
}

fn parse_output(output: Output) -> CliResponse {
    let exit_code = output.status.code().unwrap_or(-1);
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}
