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

//! Background daemon that owns the active log file.
//!
//! ## Architecture
//!
//! The daemon runs on a dedicated thread and receives [`WriteEvent`]s from
//! the [`FileSink`](crate::FileSink) façade via a bounded crossbeam channel.
//! It is the only thread that ever touches the filesystem handle, which
//! removes the need for a write-path lock and makes the on-disk order equal
//! to the enqueue order.
//!
//! ```text
//! ┌──────────────┐     crossbeam      ┌──────────────┐    append     ┌──────────────┐
//! │   FileSink   │ ──── channel ────► │    Daemon    │ ──────────►   │ temp_log.log │
//! │ (producers)  │                    │ (bg thread)  │               │              │
//! └──────────────┘                    └──────────────┘               └──────────────┘
//! ```
//!
//! ## Responsibilities
//!
//! - **Record persistence**: append records to the active file in FIFO order
//! - **Rotation**: archive the active file when the size threshold is reached
//! - **Sync barriers**: ack `Sync` markers once earlier records are written
//! - **Retention**: trigger the asynchronous cleanup sweep
//! - **Shutdown**: drain everything still queued, then release the file
//!
//! Write failures are deliberately at-most-once: the offending record is
//! dropped after an error log, and nothing is reported back to the producer.

use std::{fs, io, path::PathBuf, sync::Arc};

use bytes::BytesMut;
use chrono::Local;
use crossbeam::channel::Receiver;
use snafu::ResultExt;
use tracing::{debug, error, info};

use crate::{
    Result, SinkConfig,
    buffer::BufferPool,
    cleaner,
    error::{ArchiveFileSnafu, CreateFileSnafu, InternalSnafu, OpenFileSnafu, WriteFileSnafu},
    file::LogFile,
    message::WriteEvent,
    path::{active_file_path, archive_file_name},
};

/// Single consumer of the record queue and sole owner of the active file.
pub(crate) struct Daemon {
    /// Channel receiver for events from the sink façade.
    rx:          Receiver<WriteEvent>,
    /// Shared sink configuration (directory, rotation threshold, retention).
    config:      Arc<SinkConfig>,
    /// Pool that record buffers are returned to after writing.
    pool:        Arc<BufferPool>,
    /// Active file; absent until the first write, and between a failed
    /// rotation and the next lazy reopen.
    file:        Option<LogFile>,
    /// Canonical path of the active file.
    active_path: PathBuf,
}

impl Daemon {
    pub(crate) fn new(
        rx: Receiver<WriteEvent>,
        config: Arc<SinkConfig>,
        pool: Arc<BufferPool>,
    ) -> Self {
        let active_path = active_file_path(&config.dir);
        Self {
            rx,
            config,
            pool,
            file: None,
            active_path,
        }
    }

    /// Main run loop.
    ///
    /// Blocks on the channel and processes events until a `Shutdown` marker
    /// arrives or every sender disconnects. Either way all records still
    /// buffered in the channel are written, in order, before the thread
    /// exits and the file handle is released.
    pub(crate) fn run(&mut self) {
        info!("log sink daemon starting");

        loop {
            match self.rx.recv() {
                Ok(WriteEvent::Record(buf)) => self.consume(buf),
                Ok(WriteEvent::Sync(ack)) => {
                    // FIFO channel: everything enqueued before the barrier
                    // has already been written at this point.
                    let _ = ack.send(());
                }
                Ok(WriteEvent::Shutdown) => {
                    self.drain();
                    break;
                }
                // All senders dropped; buffered events were delivered first.
                Err(_) => break,
            }
        }

        self.release_file();
        info!("log sink daemon stopped");
    }

    /// Write one record and recycle its buffer. A failed write drops the
    /// record (at-most-once policy).
    fn consume(&mut self, buf: BytesMut) {
        if let Err(err) = self.write(&buf) {
            error!(error = ?err, "Failed to persist log record");
        }
        self.pool.release(buf);
    }

    /// Drain everything still queued after a shutdown signal.
    fn drain(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                WriteEvent::Record(buf) => self.consume(buf),
                WriteEvent::Sync(ack) => {
                    let _ = ack.send(());
                }
                WriteEvent::Shutdown => {}
            }
        }
    }

    /// Append one record, opening the active file lazily and rotating first
    /// if the projected size would reach the threshold.
    fn write(&mut self, record: &[u8]) -> Result<()> {
        if record.is_empty() {
            return Ok(());
        }

        let incoming = record.len() as u64;
        if self.file.is_none() {
            self.open_or_create(incoming)?;
        }

        if self
            .file
            .as_ref()
            .is_some_and(|file| file.size() + incoming >= self.config.max_size)
        {
            self.rotate()?;
        }

        let file = self.file.as_mut().ok_or_else(|| {
            InternalSnafu {
                message: "no active log file".to_string(),
            }
            .build()
        })?;
        file.write(record).context(WriteFileSnafu)?;
        Ok(())
    }

    /// Open the active file if it exists, or create a fresh one.
    ///
    /// An existing file that is already over the threshold (counting the
    /// incoming record) is rotated instead of reopened; an existing file
    /// that cannot be opened is replaced with a fresh one.
    fn open_or_create(&mut self, incoming: u64) -> Result<()> {
        cleaner::spawn_sweep(&self.config);

        match fs::metadata(&self.active_path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => self.create(),
            Err(err) => Err(err).context(OpenFileSnafu {
                path: self.active_path.clone(),
            }),
            Ok(meta) if meta.len() + incoming >= self.config.max_size => self.rotate(),
            Ok(_) => match LogFile::open(&self.active_path) {
                Ok(file) => {
                    self.file = Some(file);
                    Ok(())
                }
                Err(err) => {
                    debug!(path = ?self.active_path, error = ?err,
                        "Could not reopen active file, creating fresh");
                    self.create()
                }
            },
        }
    }

    /// Close the active file, archive it under a timestamped name, and
    /// start a fresh active file.
    fn rotate(&mut self) -> Result<()> {
        // Dropping the handle closes it before the rename.
        self.file.take();
        self.archive()?;
        self.create()?;
        cleaner::spawn_sweep(&self.config);
        Ok(())
    }

    /// Rename the file at the canonical active path, if any, to its archive
    /// name. First-ever rotation with no file on disk is a no-op.
    fn archive(&mut self) -> Result<()> {
        if !self.active_path.exists() {
            return Ok(());
        }
        let target = self.config.dir.join(archive_file_name(Local::now()));
        fs::rename(&self.active_path, &target).context(ArchiveFileSnafu {
            from: self.active_path.clone(),
            to:   target.clone(),
        })?;
        info!(archive = ?target, "Rotated active log file");
        Ok(())
    }

    fn create(&mut self) -> Result<()> {
        let file = LogFile::create(&self.active_path).context(CreateFileSnafu {
            path: self.active_path.clone(),
        })?;
        self.file = Some(file);
        Ok(())
    }

    /// Final flush before the thread exits.
    fn release_file(&mut self) {
        if let Some(file) = self.file.take()
            && let Err(err) = file.sync()
        {
            debug!(error = ?err, "Final sync of active log file failed");
        }
    }
}
