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

use std::io;

use crate::Level;
use crate::Logger;

/// An [`io::Write`] adapter that logs each line as one record.
///
/// Bytes are held until a newline arrives, so a `writeln!` made of several fragments is still a
/// single record. A trailing partial line is logged on [`flush`](io::Write::flush) or drop.
///
/// A writer created for [`Level::Default`] looks for a leading `[D]`, `[I]`, `[W]` or `[E]`
/// marker, strips it, and routes the record to that level. Unmarked records go to the `output`
/// files. Writers for any other level write at that level.
///
/// # Examples
///
/// ```no_run
/// use std::io::Write;
///
/// use hourlog::Config;
/// use hourlog::Level;
/// use hourlog::Logger;
///
/// let logger = Logger::new(Config::new("my-service")).unwrap();
/// let mut writer = logger.level_writer(Level::Default);
/// writeln!(writer, "[W]disk almost full").unwrap();
/// ```
#[derive(Debug)]
pub struct LevelWriter<'a> {
    logger: &'a Logger,
    level: Level,
    pending: Vec<u8>,
}

impl<'a> LevelWriter<'a> {
    pub fn new(logger: &'a Logger, level: Level) -> Self {
        Self {
            logger,
            level,
            pending: Vec::new(),
        }
    }

    fn emit(&self, line: &[u8]) {
        let (level, data) = match self.level {
            Level::Default => parse_marker(line).unwrap_or((Level::Default, line)),
            level => (level, line),
        };

        let msg = String::from_utf8_lossy(data);
        self.logger.log_at(level, None, None, &msg);
    }
}

impl Logger {
    /// Creates an [`io::Write`] adapter writing at `level`.
    pub fn level_writer(&self, level: Level) -> LevelWriter<'_> {
        LevelWriter::new(self, level)
    }
}

/// Splits a level marker off the front of `data`.
pub(crate) fn parse_marker(data: &[u8]) -> Option<(Level, &[u8])> {
    if data.len() <= 3 || data[0] != b'[' {
        return None;
    }
    let level = match &data[..3] {
        b"[D]" => Level::Debug,
        b"[I]" => Level::Info,
        b"[W]" => Level::Warn,
        b"[E]" => Level::Error,
        _ => return None,
    };
    Some((level, &data[3..]))
}

impl io::Write for LevelWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line = self.pending.drain(..=pos).collect::<Vec<_>>();
            self.emit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line);
        }
        Ok(())
    }
}

impl Drop for LevelWriter<'_> {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
