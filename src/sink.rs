// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sink façade and lifecycle management.
//!
//! The [`FileSink`] is the public entry point. It accepts pre-formatted
//! records from any number of threads, stages each one in a pooled buffer,
//! and hands it to the background daemon over a bounded FIFO channel.
//! Producers block when the queue is full (backpressure) rather than losing
//! records.
//!
//! ## Usage
//!
//! ```ignore
//! let sink = FileSinkBuilder::new("./logs")
//!     .max_size_mb(10)
//!     .max_age_secs(7 * 24 * 3600)
//!     .build()?;
//!
//! sink.enqueue(b"2026/03/07 14:05:09 [I] ready\n")?;
//! sink.sync()?;   // barrier: everything enqueued so far is on disk
//! sink.close()?;  // drain and join the daemon
//! ```

use std::{
    fs, io,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use crossbeam::channel::{SendError, Sender, bounded};
use snafu::{ResultExt, ensure};
use tracing::info;

use crate::{
    Level, Result, SinkConfig,
    buffer::BufferPool,
    daemon::Daemon,
    error::{ClosedSnafu, CreateDirSnafu, InternalSnafu, SpawnDaemonSnafu},
    message::WriteEvent,
};

/// Asynchronous, rotating, disk-backed sink for formatted log records.
///
/// Thread-safe: `enqueue` and `sync` may be called concurrently from any
/// number of threads, and `close` is idempotent. Records are persisted in
/// exactly the order their `enqueue` calls completed.
pub struct FileSink {
    /// Shared configuration, also read by the daemon and the cleaner.
    config:     Arc<SinkConfig>,
    /// Sender side of the bounded channel to the daemon.
    tx:         Sender<WriteEvent>,
    /// Buffer pool shared with the daemon.
    pool:       Arc<BufferPool>,
    /// One-way open → closed flag.
    closed:     AtomicBool,
    /// Keeps at most one sync barrier logically in flight.
    sync_token: Mutex<()>,
    /// Daemon join handle; taken by the first successful `close`.
    daemon:     Mutex<Option<JoinHandle<()>>>,
}

impl FileSink {
    /// Create the sink: make the log directory and start the daemon.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the log directory cannot be
    /// created, or the daemon thread cannot be spawned. Any of these leaves
    /// no usable sink behind.
    pub(crate) fn new(config: SinkConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.dir).context(CreateDirSnafu {
            path: config.dir.clone(),
        })?;

        let config = Arc::new(config);
        let (tx, rx) = bounded(config.queue_capacity);
        let pool = Arc::new(BufferPool::new());

        let mut daemon = Daemon::new(rx, Arc::clone(&config), Arc::clone(&pool));
        let handle = thread::Builder::new()
            .name("logsink-daemon".into())
            .spawn(move || daemon.run())
            .context(SpawnDaemonSnafu)?;

        info!(
            dir = ?config.dir,
            max_size = config.max_size,
            queue_capacity = config.queue_capacity,
            "Log sink initialized"
        );

        Ok(Self {
            config,
            tx,
            pool,
            closed: AtomicBool::new(false),
            sync_token: Mutex::new(()),
            daemon: Mutex::new(Some(handle)),
        })
    }

    /// Enqueue one formatted record for persistence.
    ///
    /// Copies the record into a pooled buffer and hands it to the daemon.
    /// Blocks while the queue is full. Returns as soon as the record is
    /// queued, before it reaches disk; use [`sync`](Self::sync) for a
    /// durability barrier.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Closed`](crate::SinkError::Closed) after the
    /// sink has been closed; the record is dropped, not queued.
    pub fn enqueue(&self, record: &[u8]) -> Result<()> {
        ensure!(!self.closed.load(Ordering::Acquire), ClosedSnafu);

        let mut buf = self.pool.acquire();
        buf.extend_from_slice(record);

        match self.tx.send(WriteEvent::Record(buf)) {
            Ok(()) => Ok(()),
            // Daemon already gone: reclaim the buffer, report closed.
            Err(SendError(event)) => {
                if let WriteEvent::Record(buf) = event {
                    self.pool.release(buf);
                }
                ClosedSnafu.fail()
            }
        }
    }

    /// Flush barrier.
    ///
    /// Blocks until every record whose `enqueue` completed before this call
    /// has been written to the active (or an archived) file. Only one sync
    /// is in flight at a time; concurrent callers serialize on an internal
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Closed`](crate::SinkError::Closed) if the sink
    /// is closed before or while the barrier is pending.
    pub fn sync(&self) -> Result<()> {
        ensure!(!self.closed.load(Ordering::Acquire), ClosedSnafu);
        let _token = self
            .sync_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (ack_tx, ack_rx) = bounded(1);
        ensure!(self.tx.send(WriteEvent::Sync(ack_tx)).is_ok(), ClosedSnafu);
        ensure!(ack_rx.recv().is_ok(), ClosedSnafu);
        Ok(())
    }

    /// Close the sink.
    ///
    /// Idempotent. The first caller signals the daemon to drain everything
    /// still queued and terminate, then joins it; concurrent and later
    /// callers unblock only after that drain has finished and the file
    /// handle is released.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon thread panicked.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.daemon.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = guard.take() else {
            return Ok(());
        };

        self.closed.store(true, Ordering::Release);
        // May block while the queue is full; the daemon keeps consuming.
        let _ = self.tx.send(WriteEvent::Shutdown);

        handle.join().map_err(|_| {
            InternalSnafu {
                message: "log sink daemon panicked".to_string(),
            }
            .build()
        })?;

        info!("Log sink closed");
        Ok(())
    }

    /// Minimum severity this sink accepts, for the logging façade to
    /// filter against before formatting.
    #[must_use]
    pub fn level(&self) -> Level { self.config.level }

    /// Get the sink configuration.
    #[must_use]
    pub fn config(&self) -> &SinkConfig { &self.config }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Dropping `tx` disconnects the channel; the daemon drains what is
        // buffered and exits on its own, without being joined here.
        if let Ok(guard) = self.daemon.get_mut()
            && guard.is_some()
        {
            self.closed.store(true, Ordering::Release);
        }
    }
}

/// Adapter so the sink can stand behind any `io::Write`-shaped collaborator.
/// `write` enqueues the record, `flush` is the sync barrier.
impl io::Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.enqueue(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { self.sync().map_err(io::Error::other) }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{FileSinkBuilder, SinkError, path::active_file_path};

    #[test]
    fn test_enqueue_sync_persists_record() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSinkBuilder::new(temp_dir.path()).build().unwrap();

        sink.enqueue(b"hello sink\n").unwrap();
        sink.sync().unwrap();

        let content = fs::read_to_string(active_file_path(temp_dir.path())).unwrap();
        assert_eq!(content, "hello sink\n");

        sink.close().unwrap();
    }

    #[test]
    fn test_level_reports_configured_severity() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSinkBuilder::new(temp_dir.path())
            .level(Level::Warning)
            .build()
            .unwrap();
        assert_eq!(sink.level(), Level::Warning);
        sink.close().unwrap();
    }

    #[test]
    fn test_operations_after_close_fail() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSinkBuilder::new(temp_dir.path()).build().unwrap();
        sink.close().unwrap();

        assert!(matches!(sink.enqueue(b"late\n"), Err(SinkError::Closed)));
        assert!(matches!(sink.sync(), Err(SinkError::Closed)));
        // Idempotent.
        sink.close().unwrap();
    }

    #[test]
    fn test_io_write_adapter() {
        use std::io::Write;

        let temp_dir = TempDir::new().unwrap();
        let mut sink = FileSinkBuilder::new(temp_dir.path()).build().unwrap();

        sink.write_all(b"via io::Write\n").unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(active_file_path(temp_dir.path())).unwrap();
        assert_eq!(content, "via io::Write\n");

        sink.close().unwrap();
    }

    #[test]
    fn test_construction_fails_on_bad_config() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileSinkBuilder::new(temp_dir.path())
            .queue_capacity(0)
            .build();
        assert!(matches!(result, Err(SinkError::InvalidConfig { .. })));
    }
}
