//! Diagnostic logging pipeline
//!
//! A log call flows through three stages:
//!
//! 1. [`CategoryFilter`] drops categorized messages that `-debug` does not enable
//! 2. [`Timestamper`] prefixes lines that start a new line
//! 3. the text goes to stdout (console mode) or to one of two [`LogSink`] channels
//!
//! The [`Logger`] owns the global switches. They are atomics and may be
//! flipped at any time; a write observes whatever value is current.

pub mod category;
pub mod sink;
pub mod timestamp;
pub mod writer;

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

pub use category::CategoryFilter;
pub use sink::{LogSink, SinkState};
pub use timestamp::{LineState, Timestamper};
pub use writer::{init_tracing, MakeDebugLogWriter};

use crate::settings::{ArgumentStore, DEBUG_KEY};

/// Primary log file name
pub const DEBUG_LOG_FILE: &str = "debug.log";
/// Secondary log file name
pub const AUX_LOG_FILE: &str = "aux.log";

pub const DEFAULT_LOGTIMESTAMPS: bool = true;
pub const DEFAULT_LOGTIMEMICROS: bool = false;

/// Which log file a message goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Primary,
    Secondary,
}

impl Channel {
    pub fn file_name(self) -> &'static str {
        match self {
            Channel::Primary => DEBUG_LOG_FILE,
            Channel::Secondary => AUX_LOG_FILE,
        }
    }
}

/// Initial values of the logger switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Write to stdout instead of the log files
    pub print_to_console: bool,
    /// Write to the log files at all
    pub print_to_debug_log: bool,
    pub log_timestamps: bool,
    pub log_time_micros: bool,
    /// Categorized messages are only considered in debug mode
    pub debug: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            print_to_console: false,
            print_to_debug_log: true,
            log_timestamps: DEFAULT_LOGTIMESTAMPS,
            log_time_micros: DEFAULT_LOGTIMEMICROS,
            debug: false,
        }
    }
}

impl LogOptions {
    /// Read the switches from resolved settings
    ///
    /// Debug mode is on when `-debug` was given at least once, none of its
    /// values is `0`, and its resolved value is not `0`. Only `-debug` is
    /// consulted, so `-nodebug` matters only when it is what set `-debug`.
    pub fn from_settings(store: &ArgumentStore) -> Self {
        let categories = store.get_multi(DEBUG_KEY);
        let debug = !categories.is_empty()
            && !categories.iter().any(|c| c == "0")
            && store.get_string(DEBUG_KEY, "") != "0";

        Self {
            print_to_console: store.get_bool("-printtoconsole", false),
            print_to_debug_log: store.get_bool("-debuglogfile", true),
            log_timestamps: store.get_bool("-logtimestamps", DEFAULT_LOGTIMESTAMPS),
            log_time_micros: store.get_bool("-logtimemicros", DEFAULT_LOGTIMEMICROS),
            debug,
        }
    }
}

/// Which channels opened successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    pub primary: bool,
    pub secondary: bool,
}

/// Process-wide logger
#[derive(Debug)]
pub struct Logger {
    print_to_console: AtomicBool,
    print_to_debug_log: AtomicBool,
    timestamper: Timestamper,
    categories: CategoryFilter,
    primary: LogSink,
    secondary: LogSink,
    misc_warning: Mutex<String>,
}

impl Logger {
    pub fn new(store: Arc<ArgumentStore>, options: LogOptions) -> Self {
        Self {
            print_to_console: AtomicBool::new(options.print_to_console),
            print_to_debug_log: AtomicBool::new(options.print_to_debug_log),
            timestamper: Timestamper::new(options.log_timestamps, options.log_time_micros),
            categories: CategoryFilter::new(store, options.debug),
            primary: LogSink::new(DEBUG_LOG_FILE),
            secondary: LogSink::new(AUX_LOG_FILE),
            misc_warning: Mutex::new(String::new()),
        }
    }

    pub fn sink(&self, channel: Channel) -> &LogSink {
        match channel {
            Channel::Primary => &self.primary,
            Channel::Secondary => &self.secondary,
        }
    }

    pub fn timestamper(&self) -> &Timestamper {
        &self.timestamper
    }

    pub fn categories(&self) -> &CategoryFilter {
        &self.categories
    }

    pub fn set_print_to_console(&self, on: bool) {
        self.print_to_console.store(on, Ordering::Relaxed);
    }

    pub fn set_print_to_debug_log(&self, on: bool) {
        self.print_to_debug_log.store(on, Ordering::Relaxed);
    }

    /// Open both channels under `dir`
    ///
    /// The channels fail independently; a channel that cannot open keeps
    /// buffering.
    pub fn open_debug_log(&self, dir: &Path) -> OpenOutcome {
        let primary = self.primary.open(dir);
        let secondary = self.secondary.open(dir);

        for (channel, result) in [(Channel::Primary, &primary), (Channel::Secondary, &secondary)] {
            match result {
                Ok(()) => debug!(file = channel.file_name(), dir = %dir.display(), "Opened log channel"),
                Err(e) => warn!(file = channel.file_name(), error = %e, "Log channel stays in memory"),
            }
        }

        OpenOutcome {
            primary: primary.is_ok(),
            secondary: secondary.is_ok(),
        }
    }

    /// Whether a message tagged with `category` passes the debug gate
    pub fn accept_category(&self, category: Option<&str>) -> bool {
        self.categories.allowed(category)
    }

    /// Timestamp and write `text`, returning the number of bytes written
    pub fn log_print_str(&self, channel: Channel, text: &str, state: &mut LineState) -> usize {
        let stamped = self.timestamper.stamp(text, state);
        self.write_raw(channel, &stamped)
    }

    /// Gate on `category`, then timestamp and write
    pub fn log_print(
        &self,
        category: Option<&str>,
        channel: Channel,
        text: &str,
        state: &mut LineState,
    ) -> usize {
        if !self.accept_category(category) {
            return 0;
        }
        self.log_print_str(channel, text, state)
    }

    /// Write already formatted text, bypassing category and timestamp
    ///
    /// Console mode goes straight to stdout without touching the sinks.
    pub fn write_raw(&self, channel: Channel, text: &str) -> usize {
        if self.print_to_console.load(Ordering::Relaxed) {
            let mut out = io::stdout().lock();
            return match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
                Ok(()) => text.len(),
                Err(_) => 0,
            };
        }

        if self.print_to_debug_log.load(Ordering::Relaxed) {
            return self.sink(channel).write(text);
        }

        0
    }

    /// A caller-owned stream on `channel` with its own line state
    pub fn stream(&self, channel: Channel) -> LogStream<'_> {
        LogStream {
            logger: self,
            channel,
            line: LineState::new(),
        }
    }

    /// `tracing` writer factory feeding the primary channel
    pub fn make_writer(self: &Arc<Self>) -> MakeDebugLogWriter {
        MakeDebugLogWriter::new(Arc::clone(self))
    }

    /// Ask both channels to reopen their files on their next write
    pub fn request_reopen(&self) {
        self.primary.request_reopen();
        self.secondary.request_reopen();
    }

    /// Trim an oversized primary log under `dir` before it is opened
    pub fn shrink_debug_file(&self, dir: &Path) -> bool {
        let path = dir.join(DEBUG_LOG_FILE);
        match sink::shrink_log_file(&path) {
            Ok(shrunk) => shrunk,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to shrink debug log");
                false
            }
        }
    }

    /// Report a failure that the caller recovers from
    ///
    /// The banner goes to the primary log and to stderr, and is kept as the
    /// most recent warning.
    pub fn print_exception_continue(&self, err: Option<&dyn Error>, thread: &str) {
        let message = format_exception(err, thread);
        let banner = format!("\n\n************************\n{}\n", message);

        let mut line = LineState::new();
        self.log_print_str(Channel::Primary, &banner, &mut line);
        eprint!("{}", banner);

        *self.misc_warning.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Most recent warning recorded by [`print_exception_continue`](Self::print_exception_continue)
    pub fn misc_warning(&self) -> String {
        self.misc_warning
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Explicit shutdown: sync and close both channels
    ///
    /// Later writes are dropped. Returns how many buffered messages never
    /// reached a file.
    pub fn shutdown(&self) -> usize {
        self.primary.close() + self.secondary.close()
    }
}

fn format_exception(err: Option<&dyn Error>, thread: &str) -> String {
    let module = env!("CARGO_PKG_NAME");
    match err {
        Some(err) => format!(
            "EXCEPTION: {:?}       \n{}       \n{} in {}       \n",
            err, err, module, thread
        ),
        None => format!("UNKNOWN EXCEPTION       \n{} in {}       \n", module, thread),
    }
}

/// Caller-owned log stream
///
/// Holds the [`LineState`] for one logical sequence of writes, so
/// soft-wrapped output gets a single timestamp.
#[derive(Debug)]
pub struct LogStream<'a> {
    logger: &'a Logger,
    channel: Channel,
    line: LineState,
}

impl LogStream<'_> {
    pub fn print(&mut self, text: &str) -> usize {
        self.logger.log_print_str(self.channel, text, &mut self.line)
    }

    pub fn print_category(&mut self, category: &str, text: &str) -> usize {
        self.logger
            .log_print(Some(category), self.channel, text, &mut self.line)
    }

    pub fn line_state(&self) -> LineState {
        self.line
    }
}
