// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Mutex;
use std::sync::PoisonError;

/// Buffers released holding this many bytes or more are not kept for reuse.
pub const DEFAULT_REUSE_THRESHOLD: usize = 256;
/// The most idle buffers a pool holds at once.
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// A free list of byte buffers used to assemble log lines.
///
/// The pool has its own lock, separate from the writer's, so checking a buffer out never waits
/// behind file I/O.
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    reuse_threshold: usize,
    max_idle: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    /// Creates an empty pool with the default limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_REUSE_THRESHOLD, DEFAULT_MAX_IDLE)
    }

    /// Creates an empty pool that keeps buffers released with fewer than `reuse_threshold` bytes
    /// in them, at most `max_idle` of them.
    pub fn with_limits(reuse_threshold: usize, max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            reuse_threshold,
            max_idle,
        }
    }

    /// Returns an empty buffer, recycled if one is available.
    pub fn acquire(&self) -> Vec<u8> {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match recycled {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => Vec::new(),
        }
    }

    /// Hands a buffer back. Buffers holding a line at or past the threshold are dropped.
    ///
    /// The check is on the content length, so a short line that pushed the capacity just past
    /// the threshold is still reused. A buffer only grows well beyond the threshold while holding
    /// a long line, and that line gets it dropped.
    pub fn release(&self, mut buf: Vec<u8>) {
        if buf.len() >= self.reuse_threshold {
            return;
        }
        buf.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_idle {
            free.push(buf);
        }
    }

    /// The number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
