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

use std::path::PathBuf;

use crate::{FileSink, Level, Result, SinkConfig};

/// Fluent builder for [`FileSink`].
///
/// Defaults: 10 MiB rotation threshold, retention disabled, queue capacity
/// 10240, level `Debug`.
pub struct FileSinkBuilder {
    config: SinkConfig,
}

impl FileSinkBuilder {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            config: SinkConfig {
                dir: dir.into(),
                ..Default::default()
            },
        }
    }

    /// Minimum severity the sink reports via [`FileSink::level`].
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    /// Rotation threshold in bytes.
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.config.max_size = bytes;
        self
    }

    /// Rotation threshold in megabytes.
    #[must_use]
    pub fn max_size_mb(mut self, mb: u64) -> Self {
        self.config.max_size = mb * 1024 * 1024;
        self
    }

    /// Retention window in seconds for archived files; `<= 0` disables
    /// cleanup.
    #[must_use]
    pub fn max_age_secs(mut self, secs: i64) -> Self {
        self.config.max_age = secs;
        self
    }

    /// Bounded queue depth; producers block when it fills up.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Build the sink: validate the configuration, create the log
    /// directory, and start the background daemon.
    pub fn build(self) -> Result<FileSink> { FileSink::new(self.config) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default_config() {
        let builder = FileSinkBuilder::new("/tmp/test_logs");
        assert_eq!(builder.config.dir, PathBuf::from("/tmp/test_logs"));
        assert_eq!(builder.config.max_size, 10 * 1024 * 1024);
        assert_eq!(builder.config.max_age, 0);
        assert_eq!(builder.config.queue_capacity, 10 * 1024);
        assert_eq!(builder.config.level, Level::Debug);
    }

    #[test]
    fn test_builder_custom_config() {
        let builder = FileSinkBuilder::new("/tmp/test_logs")
            .level(Level::Info)
            .max_size_mb(100)
            .max_age_secs(3600)
            .queue_capacity(256);

        assert_eq!(builder.config.level, Level::Info);
        assert_eq!(builder.config.max_size, 100 * 1024 * 1024);
        assert_eq!(builder.config.max_age, 3600);
        assert_eq!(builder.config.queue_capacity, 256);
    }

    #[test]
    fn test_builder_byte_granular_max_size() {
        let builder = FileSinkBuilder::new("/tmp/test_logs").max_size(1024);
        assert_eq!(builder.config.max_size, 1024);
    }
}
