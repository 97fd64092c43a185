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

use std::fs;

use hourlog::Config;
use hourlog::Level;
use tempfile::TempDir;

// The global logger can be set once per process, so everything runs in one test.
#[test]
fn test_global_logger() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");

    assert!(hourlog::default_logger().is_none());
    // logged to stdout only before initialization
    hourlog::info("before init");

    let err = hourlog::init(Config::new("")).unwrap_err();
    assert_eq!(err.message(), "log name must not be empty");
    assert!(hourlog::default_logger().is_none());

    hourlog::init(
        Config::new("global")
            .base_path(temp_dir.path())
            .level(Level::Info),
    )
    .unwrap();
    assert!(hourlog::init(Config::new("again")).is_err());

    hourlog::bridge::setup_log_crate();

    hourlog::info("direct info");
    hourlog::debug("filtered debug");
    log::error!("through the log crate");
    #[cfg(feature = "json")]
    hourlog::action(&["a", "b"]).unwrap();
    hourlog::exit();

    let logger = hourlog::default_logger().unwrap();
    let writer = logger.writer();
    assert_eq!(writer.log_name(), "global");

    let info = fs::read_to_string(writer.current_path(Level::Info).unwrap()).unwrap();
    assert!(info.contains(" global_logger.rs "), "unexpected: {info}");
    assert!(info.ends_with(" : direct info\n"));

    let error = fs::read_to_string(writer.current_path(Level::Error).unwrap()).unwrap();
    assert!(error.ends_with(" : through the log crate\n"), "unexpected: {error}");

    #[cfg(feature = "json")]
    {
        let action = fs::read_to_string(writer.current_path(Level::Action).unwrap()).unwrap();
        assert!(action.starts_with("tid-"));
        assert!(action.ends_with(" : [\"a\",\"b\"]\n"), "unexpected: {action}");
    }

    assert!(writer.current_path(Level::Debug).is_none());
}
