//! Config file handling

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, info};

use super::parser::{self, WILDCARD};
use crate::datadir::DataDir;
use crate::errors::Result;
use crate::settings::ArgumentStore;

/// Config file name used when `-conf` is not given
pub const DEFAULT_CONFIG_FILE: &str = "nodecfg.conf";

/// Location of the config file
///
/// `-conf` wins; a relative path is resolved against the data directory.
pub fn config_file_path(store: &ArgumentStore, datadir: &DataDir) -> Result<PathBuf> {
    let path = PathBuf::from(store.get_string("-conf", DEFAULT_CONFIG_FILE));
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(datadir.get(false)?.join(path))
}

/// Merge the config file into the store
///
/// Command-line values keep precedence: a key already present keeps its
/// value, but every file value is still appended to the key's sequence. A
/// missing file is created empty and is not an error. On success the data
/// directory cache is cleared, since the file may change `-datadir`.
///
/// Returns the number of entries merged.
pub fn read_config_file(store: &ArgumentStore, datadir: &DataDir) -> Result<usize> {
    let path = config_file_path(store, datadir)?;

    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Config file not readable, creating it empty");
            let _ = OpenOptions::new().create(true).append(true).open(&path);
            return Ok(0);
        }
    };

    let mut content = String::new();
    file.read_to_string(&mut content)?;

    let entries = parser::parse(&content, &[WILDCARD])?;
    let merged = store.merge_defaults(
        entries
            .into_iter()
            .map(|entry| (format!("-{}", entry.key), entry.value)),
    );

    datadir.clear_cache();
    info!(path = %path.display(), entries = merged, "Read config file");
    Ok(merged)
}
