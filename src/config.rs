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

use snafu::ensure;

use crate::{Level, Result, error::InvalidConfigSnafu};

/// Immutable sink configuration.
///
/// Constructed through [`FileSinkBuilder`](crate::FileSinkBuilder) and
/// validated exactly once when the sink is built.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Directory holding the active and archived log files.
    /// Created recursively at construction if absent.
    pub dir: PathBuf,
    /// Rotation threshold in bytes for the active file.
    pub max_size: u64,
    /// Retention window in seconds for archived files. `<= 0` disables
    /// retention cleanup entirely.
    pub max_age: i64,
    /// Capacity of the bounded record queue. Producers block when full.
    pub queue_capacity: usize,
    /// Minimum severity this sink accepts. Stored for the logging façade;
    /// the sink itself does not filter.
    pub level: Level,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            dir:            PathBuf::from("./logs"),
            max_size:       10 * 1024 * 1024,
            max_age:        0,
            queue_capacity: 10 * 1024,
            level:          Level::Debug,
        }
    }
}

impl SinkConfig {
    /// Validate the configuration. Called once at sink construction.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_size > 0, InvalidConfigSnafu {
            message: "max_size must be positive"
        });
        ensure!(self.queue_capacity > 0, InvalidConfigSnafu {
            message: "queue_capacity must be positive"
        });
        Ok(())
    }
}
