//! Config file loading
//!
//! - [`parser`] - line-level option-file syntax
//! - [`read_config_file`] - merges the file into the settings store

#[allow(clippy::module_inception)]
mod config;
pub mod parser;

pub use config::{config_file_path, read_config_file, DEFAULT_CONFIG_FILE};
pub use parser::ConfigEntry;
