//! Bridge from `tracing` into the debug log
//!
//! [`MakeDebugLogWriter`] plugs into `tracing_subscriber::fmt` so events
//! emitted with the `tracing` macros land in a log channel next to the
//! lines written through [`Logger`]. The fmt layer stamps its own time, so
//! the bridge writes raw text.

use std::io;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use super::{Channel, Logger};

/// `io::Write` handle for one formatted event
#[derive(Debug, Clone)]
pub struct DebugLogWriter {
    logger: Arc<Logger>,
    channel: Channel,
}

impl io::Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.logger.write_raw(self.channel, &text);
        // Logging never fails the caller.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Factory handed to `tracing_subscriber::fmt().with_writer(..)`
#[derive(Debug, Clone)]
pub struct MakeDebugLogWriter {
    logger: Arc<Logger>,
    channel: Channel,
}

impl MakeDebugLogWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            channel: Channel::Primary,
        }
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }
}

impl<'a> MakeWriter<'a> for MakeDebugLogWriter {
    type Writer = DebugLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DebugLogWriter {
            logger: Arc::clone(&self.logger),
            channel: self.channel,
        }
    }
}

/// Install the global `tracing` subscriber writing into the primary channel
///
/// `RUST_LOG` takes priority over `default_filter`. Returns `false` when a
/// global subscriber was already installed.
pub fn init_tracing(logger: Arc<Logger>, default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(logger.make_writer())
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogOptions, SinkState};
    use crate::settings::ArgumentStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_events_land_in_log() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(ArgumentStore::new());
        let logger = Arc::new(Logger::new(store, LogOptions::default()));

        let subscriber = tracing_subscriber::fmt()
            .with_writer(logger.make_writer())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(peer = 7, "connected");
        });
        assert_eq!(logger.sink(Channel::Primary).state(), SinkState::Buffering);

        logger.open_debug_log(tmp.path());
        let content = fs::read_to_string(tmp.path().join("debug.log")).unwrap();
        assert!(content.contains("connected"));
        assert!(content.contains("peer=7"));
    }

    #[test]
    fn test_secondary_channel_writer() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(ArgumentStore::new());
        let logger = Arc::new(Logger::new(store, LogOptions::default()));
        logger.open_debug_log(tmp.path());

        let make = MakeDebugLogWriter::new(Arc::clone(&logger)).with_channel(Channel::Secondary);
        let mut writer = make.make_writer();
        io::Write::write_all(&mut writer, b"vm trace\n").unwrap();

        let content = fs::read_to_string(tmp.path().join("aux.log")).unwrap();
        assert_eq!(content, "vm trace\n");
    }
}
