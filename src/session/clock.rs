//! Live clock shown next to the collection.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time formatted for display.
pub fn now_display() -> String {
    jiff::Zoned::now().strftime(CLOCK_FORMAT).to_string()
}

/// Republishes the formatted time every `interval` until stopped or dropped.
pub struct ClockTicker {
    interval: Duration,
    tx: Arc<watch::Sender<String>>,
    rx: watch::Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = watch::channel(now_display());
        Self {
            interval,
            tx: Arc::new(tx),
            rx,
            handle: None,
        }
    }

    /// Spawn the ticking task. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let tx = Arc::clone(&self.tx);
        let interval = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if tx.send(now_display()).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn current(&self) -> String {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.rx.clone()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
