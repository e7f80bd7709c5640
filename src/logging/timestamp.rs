//! Line timestamps
//!
//! A log line gets a `YYYY-MM-DD HH:MM:SS[.uuuuuu] ` prefix only when it
//! starts a new line. Whether the previous write ended its line is tracked
//! in a [`LineState`] owned by the caller, not by the sink: several call
//! sites may interleave writes on one channel, and each needs its own view.

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether the next write starts a new line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    started_new_line: bool,
}

impl Default for LineState {
    fn default() -> Self {
        Self::new()
    }
}

impl LineState {
    /// A fresh stream, positioned at the start of a line
    pub fn new() -> Self {
        Self {
            started_new_line: true,
        }
    }

    pub fn at_line_start(&self) -> bool {
        self.started_new_line
    }
}

/// Prefixes log text with the current time
#[derive(Debug)]
pub struct Timestamper {
    enabled: AtomicBool,
    micros: AtomicBool,
}

impl Timestamper {
    pub fn new(enabled: bool, micros: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            micros: AtomicBool::new(micros),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_micros(&self, micros: bool) {
        self.micros.store(micros, Ordering::Relaxed);
    }

    /// Stamp `text` with the current UTC time
    pub fn stamp(&self, text: &str, state: &mut LineState) -> String {
        self.stamp_at(text, state, Utc::now())
    }

    /// Stamp `text` as if written at `now`
    ///
    /// Newline tracking runs even when timestamps are off, so switching
    /// them on mid-line does not stamp the tail of a line.
    pub fn stamp_at(&self, text: &str, state: &mut LineState, now: DateTime<Utc>) -> String {
        let stamped = if self.enabled() && state.started_new_line {
            let mut out = now.format(DATE_FORMAT).to_string();
            if self.micros.load(Ordering::Relaxed) {
                let _ = write!(out, ".{:06}", now.timestamp_subsec_micros() % 1_000_000);
            }
            out.push(' ');
            out.push_str(text);
            out
        } else {
            text.to_string()
        };

        state.started_new_line = text.ends_with('\n');
        stamped
    }
}
