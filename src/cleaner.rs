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

//! Age-based retention cleanup for archived log files.
//!
//! The sweep runs on a detached thread so it never blocks producers or the
//! daemon. Faults are isolated per directory entry: a file that disappears
//! mid-scan (or any other stat/delete failure) is skipped, never aborting
//! the rest of the sweep.

use std::{
    fs::{self, DirEntry},
    io,
    path::Path,
    sync::Arc,
    time::{Duration, SystemTime},
};

use tracing::debug;

use crate::{
    SinkConfig,
    path::{ACTIVE_FILE_NAME, LOG_FILE_EXT},
};

/// Kick off an asynchronous retention sweep of the log directory.
/// No-op when retention is disabled (`max_age <= 0`).
pub(crate) fn spawn_sweep(config: &Arc<SinkConfig>) {
    if config.max_age <= 0 {
        return;
    }
    let config = Arc::clone(config);
    std::thread::spawn(move || {
        sweep(&config.dir, Duration::from_secs(config.max_age as u64));
    });
}

/// Delete every archived `.log` file older than `max_age`.
///
/// The active file is never touched, regardless of its age.
pub(crate) fn sweep(dir: &Path, max_age: Duration) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = ?dir, error = ?err, "Retention sweep could not read log directory");
            return;
        }
    };

    let now = SystemTime::now();
    for entry in entries {
        if let Err(err) = sweep_entry(entry, now, max_age) {
            debug!(error = ?err, "Skipped entry during retention sweep");
        }
    }
}

fn sweep_entry(
    entry: io::Result<DirEntry>,
    now: SystemTime,
    max_age: Duration,
) -> io::Result<()> {
    let entry = entry?;
    let metadata = entry.metadata()?;
    if metadata.is_dir() {
        return Ok(());
    }
    if entry.file_name() == ACTIVE_FILE_NAME {
        return Ok(());
    }

    let path = entry.path();
    if path.extension().and_then(|ext| ext.to_str()) != Some(LOG_FILE_EXT) {
        return Ok(());
    }

    let age = now
        .duration_since(metadata.modified()?)
        .unwrap_or_default();
    if age > max_age {
        fs::remove_file(&path)?;
        debug!(path = ?path, "Removed expired log file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;

    use super::*;

    #[test]
    fn test_sweep_removes_stale_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let stale = temp_dir.path().join("log_2026_01_01_00_00_00_1234.log");
        let active = temp_dir.path().join(ACTIVE_FILE_NAME);
        fs::write(&stale, b"old archive").unwrap();
        fs::write(&active, b"still active").unwrap();

        sleep(Duration::from_millis(1500));
        sweep(temp_dir.path(), Duration::from_secs(1));

        assert!(!stale.exists());
        assert!(active.exists());
    }

    #[test]
    fn test_sweep_keeps_fresh_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fresh = temp_dir.path().join("log_2026_01_01_00_00_00_5678.log");
        fs::write(&fresh, b"just rotated").unwrap();

        sweep(temp_dir.path(), Duration::from_secs(60));

        assert!(fresh.exists());
    }

    #[test]
    fn test_sweep_ignores_other_extensions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let other = temp_dir.path().join("notes.txt");
        fs::write(&other, b"not a log").unwrap();

        sleep(Duration::from_millis(1500));
        sweep(temp_dir.path(), Duration::from_secs(1));

        assert!(other.exists());
    }

    #[test]
    fn test_sweep_survives_missing_directory() {
        // Missing directory degrades to a no-op.
        sweep(Path::new("/nonexistent/log/dir"), Duration::from_secs(1));
    }
}
