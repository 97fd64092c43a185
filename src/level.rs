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

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Severity levels, each of which is written to its own family of files.
///
/// The order is used by [`Logger`](crate::Logger) for "at least this severe" filtering. The
/// rotating writer only uses a level to pick a stream and to name its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Records whose level was not given explicitly, such as lines written through
    /// [`LevelWriter`](crate::bridge::LevelWriter) without a level marker.
    Default = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Structured events. Lines at this level carry no timestamp prefix.
    Action = 5,
}

impl Level {
    /// The number of levels, and so the number of streams a writer can hold.
    pub const COUNT: usize = 6;

    /// The lowercase token used in file names and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Default => "output",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Action => "action",
        }
    }

    pub const fn all() -> [Level; Level::COUNT] {
        [
            Level::Default,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Action,
        ]
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Whether this level may be used as the minimum level of a logger.
    pub const fn is_filter_level(self) -> bool {
        matches!(
            self,
            Level::Debug | Level::Info | Level::Warn | Level::Error
        )
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parse a level name. The reserved `output` name is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "action" => Ok(Level::Action),
            _ => Err(Error::new("invalid level").with_context("level", s)),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}
