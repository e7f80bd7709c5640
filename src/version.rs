//! Packed version numbers
//!
//! A `major.minor.patch` version packs into the low three bytes of a `u32`
//! as `major << 16 | minor << 8 | patch`. The top byte must stay clear and
//! `0` is reserved for "no version".

use crate::errors::{NodeError, Result};

/// Placeholder printed when a packed version cannot be decoded
pub const INVALID_VERSION: &str = "invalid_version";

/// Pack `"a.b.c"` into an integer
///
/// Each component must be a non-empty run of ASCII digits no larger than 255.
pub fn string_version_to_int(version: &str) -> Result<u32> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return Err(NodeError::VersionFormat(format!(
            "expected three components in '{}'",
            version
        )));
    }

    let mut packed = 0u32;
    for part in parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NodeError::VersionFormat(format!(
                "component '{}' of '{}' is not a number",
                part, version
            )));
        }
        let value: u8 = part.parse().map_err(|_| {
            NodeError::VersionFormat(format!("component '{}' of '{}' exceeds 255", part, version))
        })?;
        packed = (packed << 8) | u32::from(value);
    }
    Ok(packed)
}

/// Unpack an integer produced by [`string_version_to_int`]
pub fn int_version_to_string(version: u32) -> Result<String> {
    if version >> 24 != 0 {
        return Err(NodeError::VersionFormat(format!(
            "{:#x} does not fit in three bytes",
            version
        )));
    }
    if version == 0 {
        return Err(NodeError::VersionFormat("version 0 is reserved".to_string()));
    }

    Ok(format!(
        "{}.{}.{}",
        (version >> 16) & 0xff,
        (version >> 8) & 0xff,
        version & 0xff
    ))
}

/// Like [`int_version_to_string`] but never fails
pub fn safe_int_version_to_string(version: u32) -> String {
    int_version_to_string(version).unwrap_or_else(|_| INVALID_VERSION.to_string())
}

/// Packed form of the running crate's version
///
/// Pre-release and build suffixes are ignored.
pub fn package_version() -> Result<u32> {
    let core = env!("CARGO_PKG_VERSION")
        .split(['-', '+'])
        .next()
        .unwrap_or_default();
    string_version_to_int(core)
}
