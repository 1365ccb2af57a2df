use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use web_time::{Duration, Instant};

use crate::*;

/// Background thread calling `on_tick` once per interval until stopped or until `on_tick` returns `false`.
///
/// Deadlines advance by whole intervals, so a slow tick does not shift the following ones.
#[derive(Debug)]
pub struct Ticker {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("minesweep-ticker".into())
            .spawn(move || {
                let mut deadline = Instant::now() + interval;
                loop {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(timeout) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !on_tick() {
                                log::trace!("ticker finished");
                                break;
                            }
                            deadline += interval;
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the thread and waits for it, safe to call any number of times.
    pub fn stop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
