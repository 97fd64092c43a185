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
use std::sync::OnceLock;

use super::Logger;
use super::caller_prefix;
use super::echo;
use crate::Config;
use crate::Error;
use crate::Level;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the default global logger instance if it has been initialized.
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Set up the process-wide logger.
///
/// The configuration is validated before anything is started.
///
/// # Errors
///
/// Return an error if the configuration is invalid or the logger has already been initialized.
///
/// # Examples
///
/// ```no_run
/// hourlog::init(hourlog::Config::new("my-service")).unwrap();
/// hourlog::info("ready");
/// hourlog::exit();
/// ```
pub fn init(config: Config) -> Result<(), Error> {
    if DEFAULT_LOGGER.get().is_some() {
        return Err(Error::new("hourlog has already been initialized"));
    }
    let logger = Logger::new(config)?;
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::new("hourlog has already been initialized"))
}

/// Flush everything buffered by the global logger. Call before the process exits.
pub fn exit() {
    if let Some(logger) = default_logger() {
        logger.exit();
    }
}

#[track_caller]
fn log(level: Level, msg: &str) {
    let location = Location::caller();
    match default_logger() {
        Some(logger) => logger.log_at(level, Some(location.file()), Some(location.line()), msg),
        None => {
            let prefix = caller_prefix(Some(location.file()), Some(location.line()));
            echo(level, &format!("{prefix}{msg}"));
        }
    }
}

/// Log at debug level through the global logger.
#[track_caller]
pub fn debug(msg: &str) {
    log(Level::Debug, msg);
}

/// Log at info level through the global logger.
#[track_caller]
pub fn info(msg: &str) {
    log(Level::Info, msg);
}

/// Log at warn level through the global logger.
#[track_caller]
pub fn warn(msg: &str) {
    log(Level::Warn, msg);
}

/// Log at error level through the global logger.
#[track_caller]
pub fn error(msg: &str) {
    log(Level::Error, msg);
}

/// Write a structured event through the global logger.
#[cfg(feature = "json")]
#[track_caller]
pub fn action<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    match default_logger() {
        Some(logger) => logger.action(value),
        None => {
            let json = serde_json::to_string(value)
                .map_err(|err| Error::new("action data cannot be serialized").with_source(err))?;
            log(Level::Action, &json);
            Ok(())
        }
    }
}
