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

//! Active log file handle with size accounting.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// An open log file plus a running byte-size counter.
///
/// `size` is only ever mutated by the daemon thread and mirrors the on-disk
/// length of the file; the rotation decision is made against it without a
/// `stat` per write. The OS handle is released on drop.
pub(crate) struct LogFile {
    file: fs::File,
    size: u64,
}

impl LogFile {
    /// Create (or truncate) the file at `path` with size 0.
    pub(crate) fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file, size: 0 })
    }

    /// Open an existing file for append, initializing `size` from its
    /// current on-disk length.
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    /// Append a record, advancing `size` by however many bytes actually
    /// reached the file even if an error interrupts the write.
    pub(crate) fn write(&mut self, mut record: &[u8]) -> io::Result<usize> {
        let mut written = 0;
        while !record.is_empty() {
            let n = self.file.write(record)?;
            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            self.size += n as u64;
            written += n;
            record = &record[n..];
        }
        Ok(written)
    }

    /// Bytes written since this file was created or opened.
    pub(crate) const fn size(&self) -> u64 { self.size }

    /// Durably flush file contents to disk.
    pub(crate) fn sync(&self) -> io::Result<()> { self.file.sync_all() }
}
