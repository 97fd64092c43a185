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

use std::fs::DirBuilder;
use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::Level;

/// Location of the file a stream writes for one rotation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPath {
    /// `<base>/logs/<name>/<YYYYMM>/<DD>`
    pub dir: PathBuf,
    /// `<level>-<HH>.log`, or `<level>-<HH>-<slot>.log` past the first slot.
    pub filename: String,
}

impl LogPath {
    /// Maps a rotation key to its directory and file name.
    pub fn resolve(
        base_path: &Path,
        log_name: &str,
        level: Level,
        time: &Zoned,
        slot: usize,
    ) -> LogPath {
        let dir = base_path
            .join("logs")
            .join(log_name)
            .join(format!("{:04}{:02}", time.year(), time.month()))
            .join(format!("{:02}", time.day()));

        let filename = if slot == 0 {
            format!("{}-{:02}.log", level.as_str(), time.hour())
        } else {
            format!("{}-{:02}-{slot}.log", level.as_str(), time.hour())
        };

        LogPath { dir, filename }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    /// Creates the directory tree if needed and opens the file for appending.
    pub fn open(&self) -> Result<File, Error> {
        let mut dirs = DirBuilder::new();
        dirs.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            dirs.mode(0o777);
        }
        dirs.create(&self.dir).map_err(|err| {
            Error::new("cannot create log directory")
                .with_context("dir", self.dir.display())
                .with_source(err)
        })?;

        let path = self.path();
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        options.open(&path).map_err(|err| {
            Error::new("cannot open log file")
                .with_context("path", path.display())
                .with_source(err)
        })
    }
}
