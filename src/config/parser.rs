//! Option-file syntax
//!
//! One `key=value` per line. Keys and values are trimmed, `#` starts a
//! comment anywhere on a line, and a line starting with `;` is a comment.
//! `[section]` headers prefix the keys below them with `section.`.
//! Repeated keys are kept in file order.

use crate::errors::{NodeError, Result};

/// Pattern accepting every key
pub const WILDCARD: &str = "*";

/// One `key=value` entry read from an option file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Key including any section prefix, without a leading `-`
    pub key: String,
    pub value: String,
    /// 1-based source line
    pub line: usize,
}

/// Whether `key` is accepted by one of the allowed-option patterns
///
/// `*` accepts everything, `name*` accepts keys starting with `name`, any
/// other pattern must match exactly.
pub fn is_allowed(key: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == *pattern,
    })
}

/// Parse option-file content, keeping only keys accepted by `allowed`
///
/// A key that no pattern accepts is an error, as is a line with no `=` or
/// with an empty key.
pub fn parse(content: &str, allowed: &[&str]) -> Result<Vec<ConfigEntry>> {
    let mut entries = Vec::new();
    let mut prefix = String::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let section = section.trim();
            prefix = if section.is_empty() {
                String::new()
            } else {
                format!("{}.", section)
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(NodeError::ConfigSyntax {
                line: line_num,
                message: format!("expected key=value, found '{}'", line),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(NodeError::ConfigSyntax {
                line: line_num,
                message: "empty key".to_string(),
            });
        }

        let key = format!("{}{}", prefix, key);
        if !is_allowed(&key, allowed) {
            return Err(NodeError::ConfigSyntax {
                line: line_num,
                message: format!("unrecognised option '{}'", key),
            });
        }

        entries.push(ConfigEntry {
            key,
            value: value.trim().to_string(),
            line: line_num,
        });
    }

    Ok(entries)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
