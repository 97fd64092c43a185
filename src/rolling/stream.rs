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

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::Level;
use crate::rolling::path::LogPath;
use crate::trap::Trap;

/// Why a stream is about to switch files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rollover {
    /// Start a new hour (or the first file) at slot 0.
    Hourly,
    /// The current file is full; continue in the next slot of the same hour.
    Size,
}

/// One rotating file destination for a single level.
#[derive(Debug)]
pub(crate) struct LevelStream {
    base_path: PathBuf,
    log_name: String,
    level: Level,
    max_size: u64,
    buffer_size: usize,

    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    opened_at: Option<Zoned>,
    slot: usize,
    bytes_written: u64,
}

impl LevelStream {
    pub(crate) fn new(
        base_path: PathBuf,
        log_name: String,
        level: Level,
        max_size: u64,
        buffer_size: usize,
    ) -> Self {
        Self {
            base_path,
            log_name,
            level,
            max_size,
            buffer_size,
            writer: None,
            path: None,
            opened_at: None,
            slot: 0,
            bytes_written: 0,
        }
    }

    pub(crate) fn should_rollover(&self, now: &Zoned) -> Option<Rollover> {
        let Some(opened_at) = self.opened_at.as_ref() else {
            return Some(Rollover::Hourly);
        };
        if opened_at.date() != now.date() || opened_at.hour() != now.hour() {
            return Some(Rollover::Hourly);
        }
        // a size rotation whose open failed keeps `opened_at` and `slot`, so it retries the
        // next slot rather than reopening a full one
        if self.writer.is_none() || self.bytes_written >= self.max_size {
            return Some(Rollover::Size);
        }
        None
    }

    /// Makes sure the file for `now` is open, rotating if the hour changed or the file is full.
    pub(crate) fn check_rotate(&mut self, now: &Zoned, trap: &dyn Trap) -> Result<(), Error> {
        match self.should_rollover(now) {
            None => Ok(()),
            Some(Rollover::Hourly) => self.rotate(now, 0, trap),
            Some(Rollover::Size) => self.rotate(now, self.slot + 1, trap),
        }
    }

    fn rotate(&mut self, now: &Zoned, slot: usize, trap: &dyn Trap) -> Result<(), Error> {
        self.path = None;
        if let Some(writer) = self.writer.take() {
            // dropping the file closes it
            if let Err(err) = close_writer(writer) {
                trap.trap(&err.with_context("level", self.level));
            }
        }

        let path = LogPath::resolve(&self.base_path, &self.log_name, self.level, now, slot);
        let file = path.open()?;

        self.writer = Some(BufWriter::with_capacity(self.buffer_size, file));
        self.path = Some(path.path());
        self.opened_at = Some(now.clone());
        self.slot = slot;
        self.bytes_written = 0;
        Ok(())
    }

    /// Appends bytes to the buffered writer.
    ///
    /// The byte count advances by what the buffer accepted, not what reached the file.
    pub(crate) fn write(&mut self, buf: &[u8]) -> Result<(), Error> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::new("no log file open").with_context("level", self.level));
        };

        let mut written = 0;
        let result = loop {
            if written == buf.len() {
                break Ok(());
            }
            match writer.write(&buf[written..]) {
                Ok(0) => {
                    break Err(std::io::Error::from(std::io::ErrorKind::WriteZero));
                }
                Ok(n) => written += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => break Err(err),
            }
        };
        self.bytes_written += written as u64;

        result.map_err(|err| {
            Error::new("failed to write log record")
                .with_context("level", self.level)
                .with_source(err)
        })
    }

    /// Hands buffered bytes to the OS and syncs the file to disk.
    pub(crate) fn flush_and_sync(&mut self) -> Result<(), Error> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .flush()
            .and_then(|()| writer.get_ref().sync_all())
            .map_err(|err| {
                Error::new("failed to flush log file")
                    .with_context("level", self.level)
                    .with_source(err)
            })
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub(crate) fn current_path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

fn close_writer(writer: BufWriter<File>) -> Result<(), Error> {
    let file = writer.into_inner().map_err(|err| {
        Error::new("failed to flush previous log file").with_source(err.into_error())
    })?;
    file.sync_all()
        .map_err(|err| Error::new("failed to sync previous log file").with_source(err))
}
