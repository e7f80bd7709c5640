//! Resolved runtime settings
//!
//! The [`ArgumentStore`] keeps two views of every option:
//!
//! - a single value per key (last writer wins within a parse pass)
//! - the ordered sequence of every raw value supplied for the key
//!
//! Both maps sit behind one exclusive lock. The store is rebuilt in full by
//! [`ArgumentStore::parse_parameters`], merged with the config file by
//! [`crate::config::read_config_file`], and read concurrently afterwards.

mod negative;
mod parser;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::strings::atoi64;

pub use parser::split_token;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Key whose value sequence holds the enabled debug categories
pub const DEBUG_KEY: &str = "-debug";

/// The two settings maps guarded by the store lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SettingsMaps {
    pub(crate) args: BTreeMap<String, String>,
    pub(crate) multi: BTreeMap<String, Vec<String>>,
}

impl SettingsMaps {
    fn clear(&mut self) {
        self.args.clear();
        self.multi.clear();
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.args.get(key) {
            Some(value) => decode_bool(value),
            None => default,
        }
    }
}

/// Boolean decoding shared by every accessor: empty means true, otherwise
/// the integer value must be non-zero.
pub fn decode_bool(value: &str) -> bool {
    value.is_empty() || atoi64(value) != 0
}

/// Process-wide store of resolved settings
#[derive(Debug)]
pub struct ArgumentStore {
    id: u64,
    maps: Mutex<SettingsMaps>,
}

impl Default for ArgumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            maps: Mutex::new(SettingsMaps::default()),
        }
    }

    /// Build a store from command-line tokens (program name excluded)
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new();
        store.parse_parameters(tokens);
        store
    }

    /// Process-unique identity, used to key per-thread caches
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SettingsMaps> {
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the store and load it from command-line tokens
    ///
    /// Scanning stops at the first token that does not start with `-`;
    /// everything after it is ignored. Every key is then run through
    /// negative-setting inversion once.
    pub fn parse_parameters<I, S>(&self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (consumed, keys) = {
            let mut maps = self.lock();
            maps.clear();
            let consumed = parser::parse_into(&mut maps, tokens);

            let keys: Vec<String> = maps.args.keys().cloned().collect();
            for key in &keys {
                maps.interpret_negative(key);
            }
            (consumed, keys.len())
        };

        debug!(tokens = consumed, keys, "Parsed command-line settings");
    }

    /// Whether the key has a single value
    pub fn is_set(&self, key: &str) -> bool {
        self.lock().args.contains_key(key)
    }

    /// String value, or `default` when the key is absent
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.lock()
            .args
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer value with `atoi` semantics, or `default` when absent
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.lock().args.get(key).map_or(default, |v| atoi64(v))
    }

    /// Boolean value, or `default` when absent
    ///
    /// A bare flag (`-foo`) is true; otherwise the value is decoded as an
    /// integer and compared against zero, so `-foo=abc` is false.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.lock().get_bool(key, default)
    }

    /// Every value supplied for the key, in insertion order
    pub fn get_multi(&self, key: &str) -> Vec<String> {
        self.lock().multi.get(key).cloned().unwrap_or_default()
    }

    /// Set the key only if it is absent; returns whether the write happened
    pub fn soft_set(&self, key: &str, value: &str) -> bool {
        let mut maps = self.lock();
        if maps.args.contains_key(key) {
            return false;
        }
        maps.args.insert(key.to_string(), value.to_string());
        true
    }

    /// Boolean flavour of [`soft_set`](Self::soft_set), storing `"1"`/`"0"`
    pub fn soft_set_bool(&self, key: &str, value: bool) -> bool {
        self.soft_set(key, if value { "1" } else { "0" })
    }

    /// Unconditionally set the key, replacing its value sequence
    pub fn force_set(&self, key: &str, value: &str) {
        let mut maps = self.lock();
        maps.args.insert(key.to_string(), value.to_string());
        maps.multi.insert(key.to_string(), vec![value.to_string()]);
    }

    /// Rewrite `-no<name>` into `-<name>` unless `-<name>` is already set
    pub fn interpret_negative(&self, key: &str) {
        self.lock().interpret_negative(key);
    }

    /// Merge `(key, value)` pairs that lose against anything already present
    ///
    /// Keys must already carry their `-` prefix. Absent keys receive the
    /// value; every value is appended to the key's sequence regardless.
    pub(crate) fn merge_defaults<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut maps = self.lock();
        let mut merged = 0;
        for (key, value) in entries {
            if !maps.args.contains_key(&key) {
                maps.args.insert(key.clone(), value.clone());
            }
            maps.multi.entry(key.clone()).or_default().push(value);
            maps.interpret_negative(&key);
            merged += 1;
        }
        merged
    }

    /// Copy of the single-value map
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().args.clone()
    }

    /// Copy of the multi-value map
    pub fn multi_snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.lock().multi.clone()
    }
}
