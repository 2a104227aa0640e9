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

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Name of the active log file inside the log directory.
pub(crate) const ACTIVE_FILE_NAME: &str = "temp_log.log";

/// Extension shared by the active file and its archives (without the dot).
pub(crate) const LOG_FILE_EXT: &str = "log";

/// Returns the canonical active file path: `<dir>/temp_log.log`.
pub(crate) fn active_file_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    dir.as_ref().join(ACTIVE_FILE_NAME)
}

/// Generates an archive file name: `log_<YYYY_MM_DD_HH_MM_SS>_<nanos>.log`.
///
/// The subsecond nanosecond suffix keeps names unique under the
/// single-writer discipline even when rotations land in the same second.
pub(crate) fn archive_file_name(time: DateTime<Local>) -> String {
    format!(
        "log_{}_{}.{}",
        time.format("%Y_%m_%d_%H_%M_%S"),
        time.timestamp_subsec_nanos(),
        LOG_FILE_EXT
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_active_file_path() {
        assert_eq!(
            active_file_path("/var/log/app"),
            PathBuf::from("/var/log/app/temp_log.log")
        );
    }

    #[test]
    fn test_archive_file_name_format() {
        let time = Local.with_ymd_and_hms(2026, 3, 7, 14, 5, 9).unwrap();
        let name = archive_file_name(time);
        assert!(name.starts_with("log_2026_03_07_14_05_09_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_archive_name_differs_from_active() {
        let name = archive_file_name(Local::now());
        assert_ne!(name, ACTIVE_FILE_NAME);
    }
}
