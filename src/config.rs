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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::Error;
use crate::Level;

/// Default root directory under which `logs/<name>` is created.
pub const DEFAULT_BASE_PATH: &str = "/data";
/// Default log name.
pub const DEFAULT_LOG_NAME: &str = "hourlog";
/// Default size, in bytes, at which a file is rotated within the same hour.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1800;
/// Default capacity of each stream's write buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;
/// Default period of the flush daemon.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration shared by [`RotatingWriter`](crate::RotatingWriter) and
/// [`Logger`](crate::Logger).
///
/// # Examples
///
/// ```
/// use hourlog::Config;
/// use hourlog::Level;
///
/// let config = Config::new("my-service")
///     .base_path("/tmp")
///     .level(Level::Info);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    base_path: PathBuf,
    log_name: String,
    max_file_size: u64,
    buffer_size: usize,
    flush_interval: Duration,
    level: Level,
    also_stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_LOG_NAME)
    }
}

impl Config {
    /// Creates a configuration for the given log name with defaults for everything else.
    #[must_use]
    pub fn new(log_name: impl Into<String>) -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            log_name: log_name.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            level: Level::Debug,
            also_stdout: false,
        }
    }

    /// Sets the base directory. An empty path leaves the current one in place.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.base_path = path;
        }
        self
    }

    /// Sets the maximum size of a log file in bytes.
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_file_size = n;
        self
    }

    /// Sets the capacity of each stream's write buffer.
    #[must_use]
    pub fn buffer_size(mut self, n: usize) -> Self {
        self.buffer_size = n;
        self
    }

    /// Sets the period of the flush daemon.
    #[must_use]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets the minimum level the logger lets through.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Echo every logged message to stdout as well.
    #[must_use]
    pub fn also_stdout(mut self, yes: bool) -> Self {
        self.also_stdout = yes;
        self
    }

    pub fn get_base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn get_log_name(&self) -> &str {
        &self.log_name
    }

    pub fn get_max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn get_buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn get_flush_interval(&self) -> Duration {
        self.flush_interval
    }

    pub fn get_level(&self) -> Level {
        self.level
    }

    pub fn get_also_stdout(&self) -> bool {
        self.also_stdout
    }

    /// Checks the configuration. Builders call this before any file is touched.
    pub fn validate(&self) -> Result<(), Error> {
        if self.log_name.is_empty() {
            return Err(Error::new("log name must not be empty"));
        }
        if self.log_name.contains(['/', '\\']) || self.log_name == "." || self.log_name == ".." {
            return Err(Error::new("log name must be a single path component")
                .with_context("log_name", &self.log_name));
        }
        if !self.level.is_filter_level() {
            return Err(Error::new("level must be one of debug, info, warn, error")
                .with_context("level", self.level));
        }
        if self.max_file_size == 0 {
            return Err(Error::new("max file size must be positive"));
        }
        if self.buffer_size == 0 {
            return Err(Error::new("buffer size must be positive"));
        }
        if self.flush_interval.is_zero() {
            return Err(Error::new("flush interval must be positive"));
        }
        Ok(())
    }
}
