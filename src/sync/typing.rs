use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::store::ChatStore;

/// Publishes the local user's typing flag for one conversation.
///
/// Every keystroke sends `isTyping=true` right away and resets the idle timer;
/// only the tail keystroke's timer fires, producing a single `isTyping=false`
/// after `idle` of inactivity. Dropping the notifier lets the task clear the
/// flag if it was still set.
pub struct TypingNotifier {
    keys_tx: mpsc::UnboundedSender<()>,
    _handle: JoinHandle<()>,
}

impl TypingNotifier {
    pub fn spawn<S: ChatStore>(store: Arc<S>, user_id: String, idle: Duration) -> Self {
        let (keys_tx, mut keys_rx) = mpsc::unbounded_channel::<()>();

        let handle = tokio::spawn(async move {
            while keys_rx.recv().await.is_some() {
                publish(&*store, &user_id, true).await;
                loop {
                    tokio::select! {
                        key = keys_rx.recv() => match key {
                            Some(()) => publish(&*store, &user_id, true).await,
                            None => {
                                // Notifier dropped mid-typing; clear the flag.
                                publish(&*store, &user_id, false).await;
                                return;
                            }
                        },
                        _ = tokio::time::sleep(idle) => {
                            publish(&*store, &user_id, false).await;
                            break;
                        }
                    }
                }
            }
        });

        Self {
            keys_tx,
            _handle: handle,
        }
    }

    /// Call on every composer keystroke.
    pub fn keystroke(&self) {
        let _ = self.keys_tx.send(());
    }
}

async fn publish<S: ChatStore + ?Sized>(store: &S, user_id: &str, is_typing: bool) {
    if let Err(e) = store.set_typing(user_id, is_typing).await {
        warn!(user_id, is_typing, error = %e, "Failed to publish typing status");
    }
}
