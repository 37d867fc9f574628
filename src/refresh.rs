//! Background content refresh
//!
//! Polls header and footer through the `ContentService` on an interval and
//! sends each result to the caller over a tokio channel. Because reads go
//! through the cache, ticks shorter than the TTL are answered without
//! touching the content API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::content::{ContentService, Layout};

/// Messages sent from background refresh to the caller
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// Header and footer as currently served
    LayoutUpdated(Layout),
}

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between polls; the first poll runs immediately
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Signals the task to stop
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the refresh task
    ///
    /// # Arguments
    /// * `service` - Content service shared with the task
    /// * `config` - Polling interval
    pub fn spawn(service: Arc<ContentService>, config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let layout = service.layout().await;
                        tracing::debug!("layout refreshed");
                        if msg_tx.send(RefreshMessage::LayoutUpdated(layout)).await.is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
