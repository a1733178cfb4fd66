//! Periodic tick source for quote countdowns
//!
//! A background thread that sends a tick message over an `mpsc` channel at a
//! fixed interval. The thread never touches wizard state; the owner of the
//! receiving end applies each tick. `TickerHandle::cancel` (or dropping the
//! handle) stops and joins the thread, so nothing is sent after it returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Handle to a running ticker thread
pub struct TickerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TickerHandle {
    /// Send `tick` on `sender` every `interval` until cancelled
    ///
    /// The thread also exits on its own once the receiver is dropped.
    pub fn spawn<T>(interval: Duration, sender: mpsc::Sender<T>, tick: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let stop = stop.clone();
            thread::spawn(move || {
                let mut last_tick = Instant::now();
                loop {
                    let timeout = interval
                        .checked_sub(last_tick.elapsed())
                        .unwrap_or(Duration::ZERO);
                    thread::park_timeout(timeout);

                    if stop.load(Ordering::Acquire) {
                        return;
                    }

                    if last_tick.elapsed() >= interval {
                        if sender.send(tick.clone()).is_err() {
                            return;
                        }
                        last_tick = Instant::now();
                    }
                }
            })
        };

        debug!(interval_ms = interval.as_millis() as u64, "ticker started");
        Self {
            stop,
            thread: Some(thread),
        }
    }

    /// Stop the thread and wait for it to exit
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            let _ = thread.join();
            debug!("ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
