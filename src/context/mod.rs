//! Process startup context
//!
//! [`NodeContext`] owns what a process resolves once at startup: the
//! settings store, the data directory and the logger. It is built in a
//! fixed order (command line, data directory, config file, logger) and torn
//! down with an explicit [`NodeContext::shutdown`].

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::read_config_file;
use crate::datadir::{create_pid_file, DataDir};
use crate::errors::Result;
use crate::logging::{LogOptions, Logger};
use crate::settings::ArgumentStore;

/// Resolved settings, data directory and logger for one process
#[derive(Debug)]
pub struct NodeContext {
    store: Arc<ArgumentStore>,
    datadir: DataDir,
    logger: Arc<Logger>,
    shut_down: AtomicBool,
}

impl NodeContext {
    /// Build the context from command-line tokens (program name excluded)
    pub fn init<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::init_with_network(tokens, "")
    }

    /// Like [`init`](Self::init), with a network subdirectory for logs and
    /// other network-specific files
    pub fn init_with_network<I, S>(tokens: I, network: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Arc::new(ArgumentStore::from_tokens(tokens));
        let datadir = DataDir::new(Arc::clone(&store)).with_network(network);

        // Fails early on a bad -datadir, before the config file is looked up.
        datadir.get(false)?;
        read_config_file(&store, &datadir)?;

        let options = LogOptions::from_settings(&store);
        let logger = Arc::new(Logger::new(Arc::clone(&store), options));

        let log_dir = datadir.get(true)?;
        if store.get_bool("-shrinkdebugfile", !options.debug) && logger.shrink_debug_file(&log_dir) {
            info!(dir = %log_dir.display(), "Shrunk debug log");
        }
        if options.print_to_debug_log {
            logger.open_debug_log(&log_dir);
        }

        debug!(?options, "Startup context ready");
        Ok(Self {
            store,
            datadir,
            logger,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn store(&self) -> &ArgumentStore {
        &self.store
    }

    pub fn datadir(&self) -> &DataDir {
        &self.datadir
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Shared handle to the logger, for the `tracing` bridge
    pub fn logger_arc(&self) -> Arc<Logger> {
        Arc::clone(&self.logger)
    }

    /// Record this process id in the pid file
    pub fn write_pid_file(&self) -> Result<()> {
        let path = self.datadir.pid_file()?;
        create_pid_file(&path, process::id())?;
        debug!(path = %path.display(), "Wrote pid file");
        Ok(())
    }

    /// Close the log channels; later calls do nothing
    ///
    /// Returns how many buffered log messages never reached a file.
    pub fn shutdown(&self) -> usize {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return 0;
        }
        self.logger.shutdown()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeError;
    use crate::logging::{Channel, SinkState, DEBUG_LOG_FILE};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn datadir_arg(dir: &Path) -> String {
        format!("-datadir={}", dir.display())
    }

    #[test]
    fn test_init_opens_logs_and_creates_config() {
        let tmp = TempDir::new().unwrap();
        let ctx = NodeContext::init([datadir_arg(tmp.path())]).unwrap();

        assert!(tmp.path().join("nodecfg.conf").is_file());
        assert_eq!(ctx.logger().sink(Channel::Primary).state(), SinkState::Open);
        assert!(tmp.path().join(DEBUG_LOG_FILE).is_file());
        assert_eq!(ctx.datadir().get(false).unwrap(), tmp.path());
    }

    #[test]
    fn test_init_with_network_logs_in_subdir() {
        let tmp = TempDir::new().unwrap();
        let _ctx = NodeContext::init_with_network([datadir_arg(tmp.path())], "regtest").unwrap();
        assert!(tmp.path().join("regtest").join(DEBUG_LOG_FILE).is_file());
        assert!(!tmp.path().join(DEBUG_LOG_FILE).exists());
    }

    #[test]
    fn test_init_reads_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("nodecfg.conf"), "maxpeers=12\n").unwrap();
        let ctx = NodeContext::init([datadir_arg(tmp.path())]).unwrap();
        assert_eq!(ctx.store().get_int("-maxpeers", 0), 12);
    }

    #[test]
    fn test_init_bad_datadir() {
        let tmp = TempDir::new().unwrap();
        let err = NodeContext::init([datadir_arg(&tmp.path().join("missing"))]).unwrap_err();
        assert!(matches!(err, NodeError::FileSystem(_)));
    }

    #[test]
    fn test_init_without_file_logging() {
        let tmp = TempDir::new().unwrap();
        let ctx = NodeContext::init([datadir_arg(tmp.path()), "-nodebuglogfile".to_string()]).unwrap();
        assert!(!tmp.path().join(DEBUG_LOG_FILE).exists());
        assert_eq!(ctx.logger().sink(Channel::Primary).state(), SinkState::Uninitialized);
    }

    #[test]
    fn test_pid_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = NodeContext::init([datadir_arg(tmp.path())]).unwrap();
        ctx.write_pid_file().unwrap();
        let content = fs::read_to_string(tmp.path().join("nodecfg.pid")).unwrap();
        assert_eq!(content.trim(), process::id().to_string());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let ctx = NodeContext::init([datadir_arg(tmp.path())]).unwrap();
        assert!(!ctx.is_shut_down());
        assert_eq!(ctx.shutdown(), 0);
        assert_eq!(ctx.shutdown(), 0);
        assert!(ctx.is_shut_down());
        assert_eq!(ctx.logger().sink(Channel::Primary).state(), SinkState::Closed);
    }
}
