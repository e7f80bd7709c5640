//! Command-line token scanning
//!
//! Accepts `-key`, `-key=value`, `--key` and `--key=value`. A leading `--`
//! is folded to a single `-`, so `--foo` and `-foo` name the same setting
//! and whichever comes last takes effect.

use super::SettingsMaps;

/// Split a token at its first `=` into `(key, value)`
///
/// The value is empty when the token carries no `=`.
pub fn split_token(token: &str) -> (&str, &str) {
    match token.split_once('=') {
        Some((key, value)) => (key, value),
        None => (token, ""),
    }
}

#[cfg(windows)]
fn platform_key(key: &str) -> String {
    let key = key.to_lowercase();
    match key.strip_prefix('/') {
        Some(rest) => format!("-{}", rest),
        None => key,
    }
}

#[cfg(not(windows))]
fn platform_key(key: &str) -> String {
    key.to_string()
}

/// Scan tokens into the maps, returning how many tokens were consumed
pub(super) fn parse_into<I, S>(maps: &mut SettingsMaps, tokens: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut consumed = 0;

    for token in tokens {
        let (key, value) = split_token(token.as_ref());
        let mut key = platform_key(key);

        if !key.starts_with('-') {
            break;
        }
        if key.starts_with("--") {
            key.remove(0);
        }

        maps.args.insert(key.clone(), value.to_string());
        maps.multi.entry(key).or_default().push(value.to_string());
        consumed += 1;
    }

    consumed
}
