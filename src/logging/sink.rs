//! Lazily opened log file channel
//!
//! A [`LogSink`] starts `Uninitialized`. The first write or open creates its
//! lock through a one-time initializer and moves it to `Buffering`, where
//! messages queue in memory. Opening the backing file drains the queue in
//! order and moves the sink to `Open`. If the file cannot be opened the sink
//! keeps buffering without limit: losing the log must never take down the
//! caller.
//!
//! The lock is held across the file write itself, so writes on one channel
//! are totally ordered and a reopen never interleaves with a write.
//!
//! Nothing in this module emits `tracing` events while the lock is held:
//! the tracing bridge writes back into the sink and the lock is not
//! reentrant.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::OnceCell;

use crate::fs::{file_commit, rename_over};
use crate::signals;

/// Shrink the debug log once it grows past this many bytes
pub const SHRINK_THRESHOLD: u64 = 10 * 1_000_000;
/// Bytes kept from the end of the log when shrinking
pub const SHRINK_KEEP: usize = 200_000;

/// Observable state of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Uninitialized,
    Buffering,
    Open,
    Closed,
}

#[derive(Debug)]
enum Backing {
    Buffering(Vec<String>),
    Open { file: File, path: PathBuf },
    Closed,
}

#[derive(Debug)]
struct Inner {
    backing: Backing,
    seen_generation: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            backing: Backing::Buffering(Vec::new()),
            seen_generation: signals::reopen_generation(),
        }
    }
}

/// One log channel backed by a file in the data directory
#[derive(Debug)]
pub struct LogSink {
    file_name: &'static str,
    inner: OnceCell<Mutex<Inner>>,
    reopen_requested: AtomicBool,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl LogSink {
    pub fn new(file_name: &'static str) -> Self {
        Self {
            file_name,
            inner: OnceCell::new(),
            reopen_requested: AtomicBool::new(false),
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Idempotent lazy construction of the channel lock
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .get_or_init(|| Mutex::new(Inner::default()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SinkState {
        if self.inner.get().is_none() {
            return SinkState::Uninitialized;
        }
        match self.lock().backing {
            Backing::Buffering(_) => SinkState::Buffering,
            Backing::Open { .. } => SinkState::Open,
            Backing::Closed => SinkState::Closed,
        }
    }

    /// Number of messages waiting for the file to open
    pub fn buffered(&self) -> usize {
        match &self.lock().backing {
            Backing::Buffering(queue) => queue.len(),
            _ => 0,
        }
    }

    /// Open `<dir>/<file_name>` in append mode and flush the queue into it
    ///
    /// On failure the sink stays in `Buffering` and the error is returned
    /// for the caller to report once the lock is released.
    pub fn open(&self, dir: &Path) -> io::Result<()> {
        let path = dir.join(self.file_name);
        let mut inner = self.lock();

        let queue = match &mut inner.backing {
            Backing::Buffering(queue) => queue,
            Backing::Open { .. } => return Ok(()),
            Backing::Closed => {
                return Err(io::Error::other("log channel already shut down"));
            }
        };

        let mut file = open_append(&path)?;
        for message in queue.drain(..) {
            // Best effort, like every other write to the log.
            let _ = file.write_all(message.as_bytes());
        }

        inner.backing = Backing::Open { file, path };
        inner.seen_generation = signals::reopen_generation();
        Ok(())
    }

    /// Ask this channel alone to reopen its file on the next write
    pub fn request_reopen(&self) {
        self.reopen_requested.store(true, Ordering::SeqCst);
    }

    /// Write `text`, returning the number of bytes accepted
    ///
    /// While buffering, the whole message is queued and its length is
    /// returned. A failed write returns 0.
    pub fn write(&self, text: &str) -> usize {
        let mut guard = self.lock();
        let Inner {
            backing,
            seen_generation,
        } = &mut *guard;

        match backing {
            Backing::Buffering(queue) => {
                queue.push(text.to_string());
                text.len()
            }
            Backing::Open { file, path } => {
                let generation = signals::reopen_generation();
                let requested = self.reopen_requested.swap(false, Ordering::SeqCst);
                if requested || generation != *seen_generation {
                    *seen_generation = generation;
                    if let Ok(reopened) = open_append(path) {
                        *file = reopened;
                    }
                }

                match file.write_all(text.as_bytes()) {
                    Ok(()) => text.len(),
                    Err(_) => 0,
                }
            }
            Backing::Closed => 0,
        }
    }

    /// Final shutdown: sync the file and refuse further writes
    ///
    /// Returns the number of queued messages that never reached a file.
    pub fn close(&self) -> usize {
        let mut inner = self.lock();
        let dropped = match &inner.backing {
            Backing::Buffering(queue) => queue.len(),
            Backing::Open { file, .. } => {
                let _ = file_commit(file);
                0
            }
            Backing::Closed => 0,
        };
        inner.backing = Backing::Closed;
        dropped
    }
}

/// Keep only the last [`SHRINK_KEEP`] bytes of a log past [`SHRINK_THRESHOLD`]
///
/// Returns whether the file was rewritten. A missing file is left alone.
pub fn shrink_log_file(path: &Path) -> io::Result<bool> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if file.metadata()?.len() <= SHRINK_THRESHOLD {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-(SHRINK_KEEP as i64)))?;
    let mut tail = Vec::with_capacity(SHRINK_KEEP);
    file.read_to_end(&mut tail)?;
    drop(file);

    let mut staging_name = path.as_os_str().to_owned();
    staging_name.push(".shrink");
    let staging = PathBuf::from(staging_name);

    let mut out = File::create(&staging)?;
    out.write_all(&tail)?;
    file_commit(&out)?;
    drop(out);

    rename_over(&staging, path)?;
    Ok(true)
}
