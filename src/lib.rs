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

//! Asynchronous, rotating, disk-backed sink for formatted log records.
//!
//! Producers hand pre-formatted byte records to a [`FileSink`]; a single
//! background daemon thread serializes all disk I/O, rotates the active file
//! when it reaches the size threshold, and asynchronously deletes archived
//! files older than the retention window. A [`FileSink::sync`] barrier
//! guarantees everything enqueued beforehand is on disk, and
//! [`FileSink::close`] drains and joins the daemon.
//!
//! Message formatting, level taxonomy, and log shipping live in the layers
//! in front of this crate; records arrive here as opaque, self-terminated
//! byte sequences.

pub mod builder;
pub mod config;
pub mod error;
pub mod level;
pub mod sink;

mod buffer;
mod cleaner;
mod daemon;
mod file;
mod message;
mod path;

pub use builder::FileSinkBuilder;
pub use config::SinkConfig;
pub use error::{Result, SinkError};
pub use level::Level;
pub use sink::FileSink;
