use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long a banner stays up without interaction.
pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Single-slot transient banner: `Hidden` or `Visible(text)`, auto-dismissing
/// after a fixed delay. A `show` while visible replaces the text and restarts
/// the timer (last write wins, no queue). Observers watch `Option<String>`,
/// `None` meaning hidden.
pub struct NotificationPresenter {
    current_tx: watch::Sender<Option<String>>,
    dismiss: Mutex<Option<JoinHandle<()>>>,
    dismiss_after: Duration,
}

impl NotificationPresenter {
    pub fn new() -> Self {
        Self::with_dismiss_after(DISMISS_AFTER)
    }

    pub fn with_dismiss_after(dismiss_after: Duration) -> Self {
        let (current_tx, _) = watch::channel(None);
        Self {
            current_tx,
            dismiss: Mutex::new(None),
            dismiss_after,
        }
    }

    /// Watch the banner state; receives `Some(text)` on show and `None` on
    /// dismiss.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current_tx.subscribe()
    }

    pub fn current(&self) -> Option<String> {
        self.current_tx.borrow().clone()
    }

    /// Display `text`, replacing any banner already up and restarting the
    /// auto-dismiss timer.
    pub fn show(&self, text: impl Into<String>) {
        let mut pending = self.dismiss.lock().unwrap();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let _ = self.current_tx.send(Some(text.into()));

        let tx = self.current_tx.clone();
        let delay = self.dismiss_after;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(None);
        }));
    }

    /// Dismiss immediately and cancel the pending timer.
    pub fn close(&self) {
        let mut pending = self.dismiss.lock().unwrap();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let _ = self.current_tx.send(None);
    }
}

impl Default for NotificationPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NotificationPresenter {
    fn drop(&mut self) {
        // No dangling timer may fire into a dropped presenter.
        if let Some(handle) = self.dismiss.lock().unwrap().take() {
            handle.abort();
        }
    }
}
