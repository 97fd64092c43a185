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

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use jiff::Zoned;

use crate::BufferPool;
use crate::Config;
use crate::Error;
use crate::Level;
use crate::rolling::clock::Clock;
use crate::rolling::daemon::FlushDaemon;
use crate::rolling::stream::LevelStream;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A writer that routes each record to a per-level file, rotated by hour and by size.
///
/// All levels of one log name share a single lock, which orders writes, rotations and flushes.
/// Writes land in an in-memory buffer per level; a background thread flushes and syncs every
/// open file on a fixed period, and [`RotatingWriter::exit`] does so one last time.
///
/// Errors never reach the caller of [`RotatingWriter::write`]. They are handed to the configured
/// [`Trap`] and the record is dropped.
///
/// # Examples
///
/// ```no_run
/// use hourlog::Config;
/// use hourlog::Level;
/// use hourlog::RotatingWriter;
///
/// let writer = RotatingWriter::new(Config::new("my-service").base_path("/tmp")).unwrap();
/// writer.write(Level::Info, "service started");
/// writer.write(Level::Action, r#"{"event":"login","uid":42}"#);
/// writer.exit();
/// ```
#[derive(Debug)]
pub struct RotatingWriter {
    shared: Arc<Shared>,
    daemon: Mutex<Option<FlushDaemon>>,
}

impl RotatingWriter {
    /// Creates a writer with the default trap.
    pub fn new(config: Config) -> Result<RotatingWriter, Error> {
        RotatingWriterBuilder::new(config).build()
    }

    /// Creates a new [`RotatingWriterBuilder`].
    #[must_use]
    pub fn builder(config: Config) -> RotatingWriterBuilder {
        RotatingWriterBuilder::new(config)
    }

    /// Writes one record without a caller prefix.
    pub fn write(&self, level: Level, text: &str) {
        self.write_with_prefix(level, "", text);
    }

    /// Writes one record as `<timestamp><prefix><text>\n`.
    ///
    /// The timestamp is left out for [`Level::Action`]. A newline is added only if the line does
    /// not already end with one.
    pub fn write_with_prefix(&self, level: Level, prefix: &str, text: &str) {
        let shared = &self.shared;
        let now = shared.clock.now();

        let mut buf = shared.pool.acquire();
        format_line(&mut buf, level, &now, prefix, text);
        shared.append(level, &now, &buf);
        shared.pool.release(buf);
    }

    /// Flushes and syncs every open file.
    pub fn flush_all(&self) {
        self.shared.flush_all();
    }

    /// Stops the flush daemon and flushes everything still buffered.
    ///
    /// Records written after this call stay buffered until the next `exit`, `flush_all` or
    /// drop.
    pub fn exit(&self) {
        let daemon = self
            .daemon
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut daemon) = daemon {
            if let Err(err) = daemon.stop() {
                self.shared.trap.trap(&err);
            }
        }
        self.shared.flush_all();
    }

    /// The file a level is currently writing to, if one is open.
    pub fn current_path(&self, level: Level) -> Option<PathBuf> {
        let streams = self.shared.lock_streams();
        streams[level.index()]
            .as_ref()
            .and_then(|stream| stream.current_path().cloned())
    }

    /// The log name this writer was configured with.
    pub fn log_name(&self) -> &str {
        &self.shared.log_name
    }
}

impl Drop for RotatingWriter {
    fn drop(&mut self) {
        self.exit();
    }
}

/// A builder for configuring [`RotatingWriter`].
#[derive(Debug)]
pub struct RotatingWriterBuilder {
    config: Config,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RotatingWriterBuilder {
    /// Creates a new [`RotatingWriterBuilder`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Clock::DefaultClock,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the trap that receives I/O errors.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RotatingWriter`] and starts its flush daemon.
    pub fn build(self) -> Result<RotatingWriter, Error> {
        let Self {
            config,
            clock,
            trap,
        } = self;
        config.validate()?;

        let shared = Arc::new(Shared {
            base_path: config.get_base_path().to_path_buf(),
            log_name: config.get_log_name().to_string(),
            max_size: config.get_max_file_size(),
            buffer_size: config.get_buffer_size(),
            streams: Mutex::new(Default::default()),
            pool: BufferPool::new(),
            clock,
            trap,
        });

        let daemon = {
            let shared = shared.clone();
            FlushDaemon::spawn(
                format!("hourlog-flush-{}", config.get_log_name()),
                config.get_flush_interval(),
                move || shared.flush_all(),
            )?
        };

        Ok(RotatingWriter {
            shared,
            daemon: Mutex::new(Some(daemon)),
        })
    }
}

#[derive(Debug)]
struct Shared {
    base_path: PathBuf,
    log_name: String,
    max_size: u64,
    buffer_size: usize,
    streams: Mutex<[Option<LevelStream>; Level::COUNT]>,
    pool: BufferPool,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl Shared {
    fn lock_streams(&self) -> MutexGuard<'_, [Option<LevelStream>; Level::COUNT]> {
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, level: Level, now: &Zoned, line: &[u8]) {
        let mut streams = self.lock_streams();
        let stream = streams[level.index()].get_or_insert_with(|| {
            LevelStream::new(
                self.base_path.clone(),
                self.log_name.clone(),
                level,
                self.max_size,
                self.buffer_size,
            )
        });

        if let Err(err) = stream.check_rotate(now, &*self.trap) {
            self.trap.trap(&err);
            return;
        }
        if let Err(err) = stream.write(line) {
            self.trap.trap(&err);
        }
    }

    fn flush_all(&self) {
        let mut streams = self.lock_streams();
        for stream in streams.iter_mut().flatten() {
            if let Err(err) = stream.flush_and_sync() {
                self.trap.trap(&err);
            }
        }
    }
}

fn format_line(buf: &mut Vec<u8>, level: Level, now: &Zoned, prefix: &str, text: &str) {
    if level != Level::Action {
        // writing into a Vec cannot fail
        let _ = write!(
            buf,
            "{}.{:03} ",
            now.strftime("%Y-%m-%d %H:%M:%S"),
            now.millisecond()
        );
    }
    buf.extend_from_slice(prefix.as_bytes());
    buf.extend_from_slice(text.as_bytes());
    if buf.last() != Some(&b'\n') {
        buf.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::str::FromStr;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::rolling::clock::ManualClock;
    use crate::trap::testing::CollectingTrap;

    fn at(s: &str) -> Zoned {
        Zoned::from_str(s).unwrap()
    }

    fn manual_writer(dir: &Path, config: Config, start: &str) -> (RotatingWriter, CollectingTrap) {
        let trap = CollectingTrap::default();
        let writer = RotatingWriterBuilder::new(config.base_path(dir))
            .clock(Clock::ManualClock(ManualClock::new(at(start))))
            .trap(trap.clone())
            .build()
            .unwrap();
        (writer, trap)
    }

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join(rel)).unwrap()
    }

    #[test]
    fn test_format_line() {
        let now = at("2024-08-10T09:05:03.042[UTC]");

        let mut buf = vec![];
        format_line(&mut buf, Level::Info, &now, "main.rs 12 : ", "hello");
        assert_eq!(buf, b"2024-08-10 09:05:03.042 main.rs 12 : hello\n");

        let mut buf = vec![];
        format_line(&mut buf, Level::Warn, &now, "", "already done\n");
        assert_eq!(buf, b"2024-08-10 09:05:03.042 already done\n");

        let mut buf = vec![];
        format_line(&mut buf, Level::Action, &now, "", r#"{"a":1}"#);
        assert_eq!(buf, b"{\"a\":1}\n");

        let mut buf = vec![];
        format_line(&mut buf, Level::Action, &now, "", "");
        assert_eq!(buf, b"\n");
    }

    #[test]
    fn test_same_hour_writes_share_a_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, trap) = manual_writer(
            temp_dir.path(),
            Config::new("app"),
            "2024-08-10T10:00:00.500[UTC]",
        );

        writer.write(Level::Info, "one");
        writer.write(Level::Info, "two\n");
        writer.write(Level::Info, "three");
        writer.exit();

        assert_eq!(
            read(temp_dir.path(), "logs/app/202408/10/info-10.log"),
            "2024-08-10 10:00:00.500 one\n\
             2024-08-10 10:00:00.500 two\n\
             2024-08-10 10:00:00.500 three\n"
        );
        assert!(trap.errors().is_empty());
    }

    #[test]
    fn test_hourly_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, trap) = manual_writer(
            temp_dir.path(),
            Config::new("app"),
            "2024-08-10T10:59:59[UTC]",
        );

        writer.write(Level::Error, "before");
        writer.shared.clock.set_now(at("2024-08-10T11:00:01[UTC]"));
        writer.write(Level::Error, "after");
        writer.shared.clock.set_now(at("2024-08-11T00:00:00[UTC]"));
        writer.write(Level::Error, "next day");
        writer.exit();

        let base = temp_dir.path();
        assert_eq!(
            read(base, "logs/app/202408/10/error-10.log"),
            "2024-08-10 10:59:59.000 before\n"
        );
        assert_eq!(
            read(base, "logs/app/202408/10/error-11.log"),
            "2024-08-10 11:00:01.000 after\n"
        );
        assert_eq!(
            read(base, "logs/app/202408/11/error-00.log"),
            "2024-08-11 00:00:00.000 next day\n"
        );
        assert!(trap.errors().is_empty());
    }

    #[test]
    fn test_size_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, _trap) = manual_writer(
            temp_dir.path(),
            Config::new("app").max_file_size(100),
            "2024-08-10T10:00:00[UTC]",
        );

        // each line is 24 bytes of timestamp plus the message and a newline
        let message = "x".repeat(25);
        let line_len = 24 + message.len() + 1;
        let mut written = 0;
        while written < 100 {
            writer.write(Level::Debug, &message);
            written += line_len;
        }
        writer.write(Level::Debug, "overflow");
        writer.exit();

        let dir = temp_dir.path().join("logs/app/202408/10");
        let first = fs::read(dir.join("debug-10.log")).unwrap();
        let second = fs::read_to_string(dir.join("debug-10-1.log")).unwrap();
        assert_eq!(first.len(), written);
        assert_eq!(second, "2024-08-10 10:00:00.000 overflow\n");
        assert_eq!(first.len() + second.len(), written + 24 + "overflow\n".len());
    }

    #[test]
    fn test_levels_have_separate_files() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, _trap) = manual_writer(
            temp_dir.path(),
            Config::new("svc"),
            "2024-01-02T03:04:05.006[UTC]",
        );

        for level in Level::all() {
            writer.write_with_prefix(level, "lib.rs 1 : ", level.as_str());
        }
        writer.exit();

        let base = temp_dir.path();
        for level in Level::all() {
            let content = read(base, &format!("logs/svc/202401/02/{}-03.log", level.as_str()));
            if level == Level::Action {
                assert_eq!(content, "lib.rs 1 : action\n");
            } else {
                assert_eq!(
                    content,
                    format!("2024-01-02 03:04:05.006 lib.rs 1 : {}\n", level.as_str())
                );
            }
        }
        assert_eq!(
            writer.current_path(Level::Warn),
            Some(base.join("logs/svc/202401/02/warn-03.log"))
        );
    }

    #[test]
    fn test_open_failure_is_trapped_and_retried() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, trap) = manual_writer(
            temp_dir.path(),
            Config::new("app"),
            "2024-08-10T10:00:00[UTC]",
        );

        let blocker = temp_dir.path().join("logs");
        fs::write(&blocker, b"").unwrap();
        writer.write(Level::Info, "dropped");
        assert_eq!(trap.errors().len(), 1);
        assert!(writer.current_path(Level::Info).is_none());

        fs::remove_file(&blocker).unwrap();
        writer.write(Level::Info, "kept");
        writer.exit();

        assert_eq!(
            read(temp_dir.path(), "logs/app/202408/10/info-10.log"),
            "2024-08-10 10:00:00.000 kept\n"
        );
        assert_eq!(trap.errors().len(), 1);
    }

    #[test]
    fn test_flush_daemon_persists_without_exit() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let (writer, _trap) = manual_writer(
            temp_dir.path(),
            Config::new("app").flush_interval(Duration::from_millis(20)),
            "2024-08-10T10:00:00[UTC]",
        );

        writer.write(Level::Warn, "flushed by the daemon");
        let path = temp_dir.path().join("logs/app/202408/10/warn-10.log");

        let mut content = String::new();
        for _ in 0..100 {
            content = fs::read_to_string(&path).unwrap();
            if !content.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(content, "2024-08-10 10:00:00.000 flushed by the daemon\n");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = RotatingWriter::new(Config::new("")).unwrap_err();
        assert_eq!(err.message(), "log name must not be empty");
    }
}
