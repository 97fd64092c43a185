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

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::select;
use crossbeam_channel::tick;

use crate::Error;

/// A background thread that runs a flush on a fixed period until it is stopped.
#[derive(Debug)]
pub(crate) struct FlushDaemon {
    handle: Option<JoinHandle<()>>,
    shutdown: Sender<()>,
}

impl FlushDaemon {
    pub(crate) fn spawn<F>(name: String, interval: Duration, flush: F) -> Result<Self, Error>
    where
        F: Fn() + Send + 'static,
    {
        let (shutdown, shutdown_receiver) = bounded(1);
        let handle = std::thread::Builder::new()
            .name(name)
            .spawn(move || run(interval, shutdown_receiver, flush))
            .map_err(|err| Error::new("failed to spawn the flush daemon").with_source(err))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Stops the daemon and waits for its thread to exit.
    pub(crate) fn stop(&mut self) -> Result<(), Error> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // a full channel means a stop is already pending
        let _ = self.shutdown.try_send(());
        handle
            .join()
            .map_err(|_| Error::new("flush daemon panicked"))
    }
}

impl Drop for FlushDaemon {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            eprintln!("[hourlog] {err}");
        }
    }
}

fn run<F: Fn()>(interval: Duration, shutdown: Receiver<()>, flush: F) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => flush(),
            // a message or a dropped sender both mean stop
            recv(shutdown) -> _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn test_daemon_ticks_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let mut daemon = FlushDaemon::spawn(
            "hourlog-flush-test".to_string(),
            Duration::from_millis(10),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();

        std::thread::sleep(Duration::from_millis(200));
        daemon.stop().unwrap();
        let stopped_at = count.load(Ordering::SeqCst);
        assert!(stopped_at > 0);

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), stopped_at);
        // stopping twice is fine
        daemon.stop().unwrap();
    }
}
