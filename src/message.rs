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

//! Channel protocol between the sink façade and the daemon.
//!
//! All three event kinds flow through the same bounded FIFO channel, which is
//! what makes the barrier semantics work: when the daemon dequeues a `Sync`
//! marker, every record enqueued before the corresponding `sync()` call has
//! already been dequeued and written.

use bytes::BytesMut;
use crossbeam::channel::Sender;

/// Event sent from the sink façade to the daemon.
pub(crate) enum WriteEvent {
    /// A formatted record in a pooled buffer; the daemon writes it to the
    /// active file and returns the buffer to the pool.
    Record(BytesMut),
    /// Flush barrier; the daemon acks once all earlier records are on disk.
    Sync(Sender<()>),
    /// Drain everything still queued, then terminate.
    Shutdown,
}
