//! Process-wide log rotation requests
//!
//! An operator (usually through a SIGHUP handler installed by the host)
//! asks for the debug logs to be reopened after an external rename or
//! truncation. Each request bumps a generation counter; every log channel
//! remembers the generation it last opened at and reopens its file on the
//! next write once the counter moves. Only atomics are touched here, so
//! [`request_log_reopen`] is safe to call from a signal handler.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter for log reopen requests
static REOPEN_GENERATION: AtomicU64 = AtomicU64::new(0);

/// Ask every open log channel to reopen its file on its next write
#[inline]
pub fn request_log_reopen() {
    REOPEN_GENERATION.fetch_add(1, Ordering::SeqCst);
}

/// Current reopen generation
#[inline]
pub fn reopen_generation() -> u64 {
    REOPEN_GENERATION.load(Ordering::SeqCst)
}
