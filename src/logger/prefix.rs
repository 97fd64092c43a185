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

use std::cell::Cell;
use std::path::Path;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TAG: Cell<u64> = const { Cell::new(0) };
}

/// A small number that stays the same for every record written from one thread.
pub(crate) fn thread_tag() -> u64 {
    THREAD_TAG.with(|tag| {
        if tag.get() == 0 {
            tag.set(NEXT_THREAD_TAG.fetch_add(1, Ordering::Relaxed));
        }
        tag.get()
    })
}

/// Builds `tid-<n> <file> <line> : `, or `tid-<n> ??? : ` when the location is unknown.
pub(crate) fn caller_prefix(file: Option<&str>, line: Option<u32>) -> String {
    let tag = thread_tag();
    match (file, line) {
        (Some(file), Some(line)) => {
            let filename = Path::new(file)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(file);
            format!("tid-{tag} {filename} {line} : ")
        }
        _ => format!("tid-{tag} ??? : "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_prefix() {
        let tag = thread_tag();
        assert_eq!(
            caller_prefix(Some("src/server/handler.rs"), Some(42)),
            format!("tid-{tag} handler.rs 42 : ")
        );
        assert_eq!(caller_prefix(None, Some(1)), format!("tid-{tag} ??? : "));
    }

    #[test]
    fn test_thread_tags_differ_across_threads() {
        let here = thread_tag();
        assert_eq!(here, thread_tag());
        let there = std::thread::spawn(thread_tag).join().unwrap();
        assert_ne!(here, there);
    }
}
