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

use std::{io, path::PathBuf};

use snafu::Snafu;

/// Sink operation errors.
///
/// Producers only ever observe [`SinkError::Closed`] (and construction-time
/// failures); disk-level failures are absorbed by the daemon and logged.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SinkError {
    /// Enqueue or sync attempted after the sink was closed.
    #[snafu(display("log sink already closed"))]
    Closed,

    /// Configuration rejected at construction time.
    #[snafu(display("Invalid sink configuration: {message}"))]
    InvalidConfig { message: String },

    /// Failed to create the log directory at construction time.
    #[snafu(display("Failed to create log directory {}", path.display()))]
    CreateDir { path: PathBuf, source: io::Error },

    /// Failed to create a fresh active log file.
    #[snafu(display("Failed to create log file {}", path.display()))]
    CreateFile { path: PathBuf, source: io::Error },

    /// Failed to open the existing active log file.
    #[snafu(display("Failed to open log file {}", path.display()))]
    OpenFile { path: PathBuf, source: io::Error },

    /// Failed to append a record to the active log file.
    #[snafu(display("Failed to write to active log file"))]
    WriteFile { source: io::Error },

    /// Failed to rename the active file to its archive name during rotation.
    #[snafu(display("Failed to archive {} as {}", from.display(), to.display()))]
    ArchiveFile {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    /// Failed to spawn the background daemon thread.
    #[snafu(display("Failed to spawn log sink daemon"))]
    SpawnDaemon { source: io::Error },

    #[snafu(display("Internal error: {message}"))]
    Internal { message: String },
}

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
