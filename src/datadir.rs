//! Data directory resolution
//!
//! The data directory holds the config file, the debug logs and the pid
//! file. It is resolved lazily from `-datadir` (or the platform default),
//! created on first use, and cached until [`DataDir::clear_cache`] is called.
//! Reading the config file clears the cache because the file may itself
//! redefine `-datadir`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::errors::{NodeError, Result};
use crate::fs::{absolute, try_create_directory};
use crate::settings::ArgumentStore;

/// Default pid file name, relative to the network data directory
pub const DEFAULT_PID_FILE: &str = "nodecfg.pid";

#[derive(Debug, Default)]
struct PathCache {
    base: Option<PathBuf>,
    net_specific: Option<PathBuf>,
}

/// Resolver and cache for the process data directory
#[derive(Debug)]
pub struct DataDir {
    store: Arc<ArgumentStore>,
    network: Option<String>,
    cache: Mutex<PathCache>,
}

impl DataDir {
    pub fn new(store: Arc<ArgumentStore>) -> Self {
        Self {
            store,
            network: None,
            cache: Mutex::new(PathCache::default()),
        }
    }

    /// Subdirectory appended for network-specific lookups (e.g. `regtest`)
    pub fn with_network(mut self, subdir: impl Into<String>) -> Self {
        let subdir = subdir.into();
        self.network = (!subdir.is_empty()).then_some(subdir);
        self
    }

    /// Platform default used when `-datadir` is not given
    pub fn default_path() -> PathBuf {
        #[cfg(windows)]
        {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("/"))
                .join("NodeCfg")
        }

        #[cfg(target_os = "macos")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/"))
                .join("Library/Application Support/NodeCfg")
        }

        #[cfg(not(any(windows, target_os = "macos")))]
        {
            dirs::home_dir()
                .filter(|home| !home.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(".nodecfg")
        }
    }

    fn cache(&self) -> MutexGuard<'_, PathCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve (and create) the data directory
    ///
    /// With `net_specific` the network subdirectory is appended. A
    /// `-datadir` that is not an existing directory is an error.
    pub fn get(&self, net_specific: bool) -> Result<PathBuf> {
        let mut cache = self.cache();
        let slot = if net_specific {
            &mut cache.net_specific
        } else {
            &mut cache.base
        };

        if let Some(path) = slot.as_ref() {
            return Ok(path.clone());
        }

        let mut path = if self.store.is_set("-datadir") {
            let configured = absolute(Path::new(&self.store.get_string("-datadir", "")))?;
            if !configured.is_dir() {
                return Err(NodeError::FileSystem(format!(
                    "Specified data directory '{}' does not exist",
                    configured.display()
                )));
            }
            configured
        } else {
            Self::default_path()
        };

        if net_specific {
            if let Some(network) = &self.network {
                path.push(network);
            }
        }

        fs::create_dir_all(&path).map_err(|e| {
            NodeError::FileSystem(format!(
                "Failed to create data directory '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), net_specific, "Resolved data directory");
        *slot = Some(path.clone());
        Ok(path)
    }

    /// Forget both cached paths
    pub fn clear_cache(&self) {
        let mut cache = self.cache();
        cache.base = None;
        cache.net_specific = None;
    }

    /// Resolve `-exportdir`, creating it if needed
    ///
    /// Returns `None` when the option is not set.
    pub fn export_dir(&self) -> Result<Option<PathBuf>> {
        if !self.store.is_set("-exportdir") {
            return Ok(None);
        }

        let path = absolute(Path::new(&self.store.get_string("-exportdir", "")))?;
        if path.exists() && !path.is_dir() {
            return Err(NodeError::FileSystem(format!(
                "The -exportdir '{}' already exists and is not a directory",
                path.display()
            )));
        }
        if !path.exists() && try_create_directory(&path).is_err() {
            return Err(NodeError::FileSystem(format!(
                "Failed to create directory at -exportdir '{}'",
                path.display()
            )));
        }
        Ok(Some(path))
    }

    /// Location of the pid file (`-pid`, relative to the network data dir)
    ///
    /// A bare `-pid` selects the default name.
    pub fn pid_file(&self) -> Result<PathBuf> {
        let name = self.store.get_string("-pid", "");
        let path = PathBuf::from(if name.is_empty() { DEFAULT_PID_FILE } else { &name });
        if path.is_absolute() {
            return Ok(path);
        }
        Ok(self.get(true)?.join(path))
    }
}

/// Write `pid` followed by a newline to `path`
pub fn create_pid_file(path: &Path, pid: u32) -> Result<()> {
    fs::write(path, format!("{}\n", pid))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_datadir(dir: &Path) -> Arc<ArgumentStore> {
        Arc::new(ArgumentStore::from_tokens([format!("-datadir={}", dir.display())]))
    }

    #[test]
    fn test_get_uses_datadir_setting() {
        let tmp = TempDir::new().unwrap();
        let datadir = DataDir::new(store_with_datadir(tmp.path()));
        assert_eq!(datadir.get(false).unwrap(), tmp.path());
    }

    #[test]
    fn test_net_specific_appends_network() {
        let tmp = TempDir::new().unwrap();
        let datadir = DataDir::new(store_with_datadir(tmp.path())).with_network("regtest");
        let net = datadir.get(true).unwrap();
        assert_eq!(net, tmp.path().join("regtest"));
        assert!(net.is_dir());
        assert_eq!(datadir.get(false).unwrap(), tmp.path());
    }

    #[test]
    fn test_missing_datadir_is_error() {
        let tmp = TempDir::new().unwrap();
        let datadir = DataDir::new(store_with_datadir(&tmp.path().join("nope")));
        assert!(matches!(datadir.get(false), Err(NodeError::FileSystem(_))));
    }

    #[test]
    fn test_cache_survives_until_cleared() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let store = store_with_datadir(first.path());
        let datadir = DataDir::new(Arc::clone(&store));
        assert_eq!(datadir.get(false).unwrap(), first.path());

        store.force_set("-datadir", &second.path().display().to_string());
        assert_eq!(datadir.get(false).unwrap(), first.path());

        datadir.clear_cache();
        assert_eq!(datadir.get(false).unwrap(), second.path());
    }

    #[test]
    fn test_export_dir() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("exports");
        let store = Arc::new(ArgumentStore::from_tokens([format!(
            "-exportdir={}",
            target.display()
        )]));
        let datadir = DataDir::new(store);
        assert_eq!(datadir.export_dir().unwrap(), Some(target.clone()));
        assert!(target.is_dir());
    }

    #[test]
    fn test_export_dir_over_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("file");
        fs::write(&target, b"x").unwrap();
        let store = Arc::new(ArgumentStore::from_tokens([format!(
            "-exportdir={}",
            target.display()
        )]));
        let err = DataDir::new(store).export_dir().unwrap_err();
        assert!(err.to_string().contains("already exists and is not a directory"));
    }

    #[test]
    fn test_export_dir_unset() {
        let datadir = DataDir::new(Arc::new(ArgumentStore::new()));
        assert!(datadir.export_dir().unwrap().is_none());
    }

    #[test]
    fn test_pid_file() {
        let tmp = TempDir::new().unwrap();
        let datadir = DataDir::new(store_with_datadir(tmp.path()));
        let pid_path = datadir.pid_file().unwrap();
        assert_eq!(pid_path, tmp.path().join(DEFAULT_PID_FILE));

        create_pid_file(&pid_path, 4242).unwrap();
        assert_eq!(fs::read_to_string(&pid_path).unwrap(), "4242\n");
    }
}
