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

use crate::Level;
use crate::Logger;
use crate::default_logger;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(logger) = default_logger() else {
            return false;
        };

        log::Log::enabled(logger, metadata)
    }

    fn log(&self, record: &log::Record) {
        if let Some(logger) = default_logger() {
            log::Log::log(logger, record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = default_logger() {
            log::Log::flush(logger);
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from log
/// crate will be forwarded to the global logger set up by [`init`](crate::init). Records logged
/// before `init` are dropped.
///
/// This function will set the global maximum log level to `Trace`; level filtering is left to
/// the configured [`Logger`].
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "hourlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }

        let msg = match record.args().as_str() {
            Some(msg) => std::borrow::Cow::Borrowed(msg),
            None => std::borrow::Cow::Owned(record.args().to_string()),
        };
        self.log_at(level, record.file(), record.line(), &msg);
    }

    fn flush(&self) {
        self.writer().flush_all();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::Config;
    use crate::Level;
    use crate::Logger;

    #[test]
    fn test_log_records_are_routed_by_level() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = Logger::new(
            Config::new("app")
                .base_path(temp_dir.path())
                .level(Level::Info),
        )
        .unwrap();

        let record = log::Record::builder()
            .args(format_args!("from the log crate"))
            .level(log::Level::Warn)
            .file(Some("src/service.rs"))
            .line(Some(7))
            .build();
        log::Log::log(&logger, &record);

        let record = log::Record::builder()
            .args(format_args!("too chatty"))
            .level(log::Level::Trace)
            .build();
        assert!(!log::Log::enabled(&logger, record.metadata()));
        log::Log::log(&logger, &record);
        log::Log::flush(&logger);

        let path = logger.writer().current_path(Level::Warn).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(
            content.ends_with(" service.rs 7 : from the log crate\n"),
            "unexpected content: {content}"
        );
        assert!(logger.writer().current_path(Level::Debug).is_none());
    }
}
