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

//! Hourlog writes leveled log records to per-level files that rotate every hour and whenever a
//! file grows past a size limit.
//!
//! # Overview
//!
//! Each level gets its own family of files under
//! `<base>/logs/<name>/<YYYYMM>/<DD>/<level>-<HH>.log`. Writes go to an in-memory buffer per
//! level; a background thread flushes and syncs all files every few seconds, and
//! [`exit`] does so one last time before the process ends. Failing to create or write a file
//! never panics or returns an error to the caller: the record is dropped and the error is
//! reported on stderr.
//!
//! # Examples
//!
//! Using the global logger:
//!
//! ```no_run
//! use hourlog::Config;
//! use hourlog::Level;
//!
//! hourlog::init(Config::new("my-service").level(Level::Info)).unwrap();
//!
//! hourlog::info("service started");
//! hourlog::debug("this is filtered out");
//! hourlog::exit();
//! ```
//!
//! Using the writer directly:
//!
//! ```no_run
//! use hourlog::Config;
//! use hourlog::Level;
//! use hourlog::RotatingWriter;
//!
//! let writer = RotatingWriter::new(Config::new("my-service").base_path("/var/tmp")).unwrap();
//! writer.write(Level::Warn, "queue is backing up");
//! writer.exit();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod config;
pub mod rolling;
pub mod trap;

mod error;
mod level;
mod logger;
mod pool;

pub use config::Config;
pub use error::Error;
pub use level::Level;
pub use logger::*;
pub use pool::BufferPool;
pub use rolling::RotatingWriter;
pub use rolling::RotatingWriterBuilder;
pub use trap::Trap;
