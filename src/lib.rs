//! nodecfg library interface
//!
//! Runtime configuration and diagnostic logging for a long-running node
//! process: command-line and config-file settings, data directory
//! resolution, and a two-channel debug log.
//!
//! # Module Organization
//!
//! - [`settings`] - Argument store and command-line parsing (ArgumentStore)
//! - [`config`] - Config file loading (read_config_file)
//! - [`datadir`] - Data directory resolution (DataDir)
//! - [`logging`] - Debug log pipeline (Logger, LogSink, CategoryFilter, Timestamper)
//! - [`context`] - Startup wiring (NodeContext)
//! - [`errors`] - Error types (NodeError, Result)
//! - [`signals`] - Log reopen requests (request_log_reopen)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`version`] - Packed version numbers
//! - [`help`] - Help text layout

pub mod config;
pub mod context;
pub mod datadir;
pub mod errors;
pub mod fs;
pub mod help;
pub mod logging;
pub mod settings;
pub mod signals;
pub mod status;
pub mod strings;
pub mod version;

pub use context::NodeContext;
pub use errors::{NodeError, Result};
pub use logging::{Channel, Logger};
pub use settings::ArgumentStore;
