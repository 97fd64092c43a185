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

use std::panic::Location;

use jiff::Zoned;

use crate::Config;
use crate::Error;
use crate::Level;
use crate::RotatingWriter;
use crate::RotatingWriterBuilder;
use crate::trap::Trap;

mod global;
mod prefix;

pub use global::*;
pub(crate) use prefix::caller_prefix;

/// A leveled logger in front of a [`RotatingWriter`].
///
/// Debug to error records pass when they are at least as severe as the configured level. Action
/// records and records without an explicit level always pass. Each line carries a
/// `tid-<n> <file> <line> : ` prefix naming the calling thread and source location.
#[derive(Debug)]
pub struct Logger {
    writer: RotatingWriter,
    level: Level,
    also_stdout: bool,
}

impl Logger {
    /// Creates a logger and its writer from a configuration.
    pub fn new(config: Config) -> Result<Logger, Error> {
        Self::build(RotatingWriter::builder(config.clone()), &config)
    }

    /// Creates a logger whose writer reports I/O errors to `trap`.
    pub fn with_trap(config: Config, trap: impl Into<Box<dyn Trap>>) -> Result<Logger, Error> {
        Self::build(RotatingWriter::builder(config.clone()).trap(trap), &config)
    }

    fn build(builder: RotatingWriterBuilder, config: &Config) -> Result<Logger, Error> {
        Ok(Logger {
            writer: builder.build()?,
            level: config.get_level(),
            also_stdout: config.get_also_stdout(),
        })
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Default | Level::Action => true,
            level => level >= self.level,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn writer(&self) -> &RotatingWriter {
        &self.writer
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg);
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    /// Serializes `value` as JSON and writes it at [`Level::Action`].
    #[cfg(feature = "json")]
    #[track_caller]
    pub fn action<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        let location = Location::caller();
        let json = serde_json::to_string(value)
            .map_err(|err| Error::new("action data cannot be serialized").with_source(err))?;
        self.log_at(
            Level::Action,
            Some(location.file()),
            Some(location.line()),
            &json,
        );
        Ok(())
    }

    /// Writes `msg` at `level` if the level is enabled.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str) {
        let location = Location::caller();
        self.log_at(level, Some(location.file()), Some(location.line()), msg);
    }

    /// Writes `msg` at `level` with an explicit source location.
    pub fn log_at(&self, level: Level, file: Option<&str>, line: Option<u32>, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        let prefix = caller_prefix(file, line);
        self.writer.write_with_prefix(level, &prefix, msg);
        if self.also_stdout {
            echo(level, msg);
        }
    }

    /// Flushes everything buffered and stops the periodic flush.
    pub fn exit(&self) {
        self.writer.exit();
    }
}

/// Prints a record to stdout, used for console echo and before initialization.
pub(crate) fn echo(level: Level, msg: &str) {
    let now = Zoned::now();
    println!(
        "{} [{}] {}",
        now.strftime("%Y-%m-%d %H:%M:%S"),
        level,
        msg.trim_end_matches('\n')
    );
}
