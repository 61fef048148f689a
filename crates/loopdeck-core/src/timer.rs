//! Cancellable delay for the surface swap
//!
//! Each scheduled swap runs as a small tokio task that sleeps and then sends
//! its token back over a channel. The event loop drains the channel on its
//! own schedule, so the carousel is only ever touched from one place.
//! Dropping the scheduler aborts everything still pending.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::reset::SwapToken;

pub struct SwapScheduler {
    tx: mpsc::UnboundedSender<SwapToken>,
    rx: mpsc::UnboundedReceiver<SwapToken>,
    pending: HashMap<SwapToken, JoinHandle<()>>,
}

impl Default for SwapScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    /// Fire `token` after `delay`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, token: SwapToken, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(token).is_err() {
                warn!("Swap timer fired after scheduler was dropped");
            }
        });
        debug!(token = token.0, delay_ms = delay.as_millis(), "Scheduled swap");
        if let Some(previous) = self.pending.insert(token, handle) {
            previous.abort();
        }
    }

    pub fn cancel(&mut self, token: SwapToken) {
        if let Some(handle) = self.pending.remove(&token) {
            handle.abort();
            debug!(token = token.0, "Cancelled swap");
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    /// Next fired token, if any, without waiting
    pub fn try_next(&mut self) -> Option<SwapToken> {
        let token = self.rx.try_recv().ok()?;
        self.pending.remove(&token);
        Some(token)
    }

    /// Wait for the next fired token
    pub async fn next(&mut self) -> Option<SwapToken> {
        let token = self.rx.recv().await?;
        self.pending.remove(&token);
        Some(token)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for SwapScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
