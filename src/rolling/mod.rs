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

//! The rotating per-level file writer.
//!
//! Files are laid out as `<base>/logs/<name>/<YYYYMM>/<DD>/<level>-<HH>.log`. When a file
//! reaches the configured size within the same hour, writing continues in
//! `<level>-<HH>-<slot>.log` with the slot counting up from 1.

pub use path::LogPath;
pub use writer::RotatingWriter;
pub use writer::RotatingWriterBuilder;

mod clock;
mod daemon;
mod path;
mod stream;
mod writer;
