use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Repeating timer that drives one fetch operation for as long as its view is
/// active. Each tick fires the fetch fire-and-forget; overlapping in-flight
/// fetches are arbitrated downstream by sequence numbers, not prevented here.
/// No backoff or retry: a failed tick is the tick closure's problem to log.
pub struct Poller {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start polling. The first tick fires immediately (initial load), then
    /// every `interval` thereafter.
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!(poller = name, "Stopping poller");
                        break;
                    }
                    _ = timer.tick() => {
                        tokio::spawn(tick());
                    }
                }
            }
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Stop the timer. In-flight fetches from earlier ticks may still resolve;
    /// their responses are discarded by the reconciler.
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        self.handle.abort();
    }
}
