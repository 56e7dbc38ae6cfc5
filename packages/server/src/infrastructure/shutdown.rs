//! Shutdown trigger backed by a `tokio::sync::watch` channel.

use tokio::sync::watch;

use crate::domain::ShutdownTrigger;

/// Shared by the restart use case (which triggers it), the session loops
/// and the server (which wait on it).
#[derive(Debug)]
pub struct WatchShutdown {
    sender: watch::Sender<bool>,
}

impl WatchShutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Resolves once shutdown has been triggered (immediately if it already was).
    pub async fn wait(&self) {
        let mut receiver = self.subscribe();
        // the sender lives as long as `self`, so this cannot fail while we are borrowed
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

impl Default for WatchShutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownTrigger for WatchShutdown {
    fn trigger(&self) {
        self.sender.send_replace(true);
        tracing::info!("Shutdown triggered");
    }

    fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }
}
