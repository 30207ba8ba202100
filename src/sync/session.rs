use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::events::SyncEvent;
use crate::models::{Conversation, Message, PresenceStatus};
use crate::store::{ChatStore, StoreError};
use crate::sync::poller::Poller;
use crate::sync::reconcile::{ConversationOutcome, MessageOutcome, SyncState};
use crate::sync::typing::TypingNotifier;

/// Poll cadences and timer durations. Production defaults match the deployed
/// client; embedders and tests may override.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub conversation_poll: Duration,
    pub message_poll: Duration,
    pub typing_poll: Duration,
    pub presence_poll: Duration,
    pub typing_idle: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            conversation_poll: Duration::from_secs(5),
            message_poll: Duration::from_secs(3),
            typing_poll: Duration::from_secs(2),
            presence_poll: Duration::from_secs(5),
            typing_idle: Duration::from_secs(2),
        }
    }
}

/// Ephemeral per-counterpart flags, fetched independently of messages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeerStatus {
    pub is_typing: bool,
    pub presence: Option<PresenceStatus>,
}

/// Pollers tied to the currently selected conversation. Dropping this stops
/// all of them before the next selection's pollers start.
struct ActiveView {
    conversation_id: String,
    typing: TypingNotifier,
    _message_poll: Poller,
    _typing_poll: Poller,
    _presence_poll: Poller,
}

/// Orchestrates the polling sync client for one signed-in user: a
/// conversation-list poller for the session lifetime, plus message, typing and
/// presence pollers for whichever conversation is selected. All observed
/// changes surface as [`SyncEvent`]s on the channel returned by [`new`].
///
/// [`new`]: ChatSession::new
pub struct ChatSession<S: ChatStore> {
    store: Arc<S>,
    self_id: String,
    config: SessionConfig,
    state: Arc<Mutex<SyncState>>,
    peers: Arc<DashMap<String, PeerStatus>>,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    conversation_poll: Poller,
    active: Option<ActiveView>,
}

impl<S: ChatStore> ChatSession<S> {
    /// Start the session and its conversation-list poller. The receiver yields
    /// every event until the session is shut down or dropped.
    pub fn new(
        store: Arc<S>,
        self_id: &str,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SyncState::new(self_id)));

        let conversation_poll = {
            let store = store.clone();
            let state = state.clone();
            let events = events_tx.clone();
            Poller::spawn("conversations", config.conversation_poll, move || {
                let store = store.clone();
                let state = state.clone();
                let events = events.clone();
                async move {
                    let seq = state.lock().unwrap().begin_request();
                    match store.conversations().await {
                        Ok(snapshot) => {
                            let outcome = state.lock().unwrap().apply_conversations(seq, snapshot);
                            if let ConversationOutcome::Replaced(list) = outcome {
                                let _ = events.send(SyncEvent::ConversationsUpdated(list));
                            }
                        }
                        Err(e) => warn!(error = %e, "Conversation poll failed"),
                    }
                }
            })
        };

        let session = Self {
            store,
            self_id: self_id.to_string(),
            config,
            state,
            peers: Arc::new(DashMap::new()),
            events_tx,
            conversation_poll,
            active: None,
        };
        (session, events_rx)
    }

    /// Select the conversation with `conversation_id` (the counterpart's user
    /// id). Any previous selection's pollers stop before the new ones start;
    /// late responses for the old target are discarded by the reconciler.
    pub fn select_conversation(&mut self, conversation_id: &str) {
        // Stops the old timers first.
        self.active = None;
        self.state
            .lock()
            .unwrap()
            .select_conversation(conversation_id);

        info!(conversation_id, "Selected conversation");
        let id = conversation_id.to_string();

        let message_poll = {
            let store = self.store.clone();
            let state = self.state.clone();
            let events = self.events_tx.clone();
            let id = id.clone();
            Poller::spawn("messages", self.config.message_poll, move || {
                let store = store.clone();
                let state = state.clone();
                let events = events.clone();
                let id = id.clone();
                async move {
                    let seq = state.lock().unwrap().begin_request();
                    match store.messages(&id).await {
                        Ok(snapshot) => {
                            let outcome = state.lock().unwrap().apply_messages(seq, &id, snapshot);
                            if let MessageOutcome::Applied {
                                messages,
                                new_from,
                                scroll,
                            } = outcome
                            {
                                let _ = events.send(SyncEvent::MessagesUpdated {
                                    conversation_id: id.clone(),
                                    messages,
                                });
                                if let Some(sender) = new_from {
                                    let _ = events.send(SyncEvent::NewMessage {
                                        conversation_id: id.clone(),
                                        sender,
                                    });
                                }
                                if scroll {
                                    let _ = events.send(SyncEvent::ScrollToBottom);
                                }
                            }
                        }
                        Err(e) => warn!(conversation_id = %id, error = %e, "Message poll failed"),
                    }
                }
            })
        };

        let typing_poll = {
            let store = self.store.clone();
            let peers = self.peers.clone();
            let events = self.events_tx.clone();
            let id = id.clone();
            Poller::spawn("typing", self.config.typing_poll, move || {
                let store = store.clone();
                let peers = peers.clone();
                let events = events.clone();
                let id = id.clone();
                async move {
                    match store.typing_status(&id).await {
                        Ok(is_typing) => {
                            let mut entry = peers.entry(id.clone()).or_default();
                            if entry.is_typing != is_typing {
                                entry.is_typing = is_typing;
                                drop(entry);
                                let _ = events.send(SyncEvent::TypingChanged {
                                    user_id: id.clone(),
                                    is_typing,
                                });
                            }
                        }
                        Err(e) => warn!(user_id = %id, error = %e, "Typing poll failed"),
                    }
                }
            })
        };

        let presence_poll = {
            let store = self.store.clone();
            let peers = self.peers.clone();
            let events = self.events_tx.clone();
            let id = id.clone();
            Poller::spawn("presence", self.config.presence_poll, move || {
                let store = store.clone();
                let peers = peers.clone();
                let events = events.clone();
                let id = id.clone();
                async move {
                    match store.presence(&id).await {
                        Ok(status) => {
                            let mut entry = peers.entry(id.clone()).or_default();
                            if entry.presence != Some(status) {
                                entry.presence = Some(status);
                                drop(entry);
                                let _ = events.send(SyncEvent::PresenceChanged {
                                    user_id: id.clone(),
                                    status,
                                });
                            }
                        }
                        Err(e) => warn!(user_id = %id, error = %e, "Presence poll failed"),
                    }
                }
            })
        };

        let typing = TypingNotifier::spawn(self.store.clone(), id.clone(), self.config.typing_idle);

        self.active = Some(ActiveView {
            conversation_id: id,
            typing,
            _message_poll: message_poll,
            _typing_poll: typing_poll,
            _presence_poll: presence_poll,
        });
    }

    /// Close the message view; stops the per-conversation pollers.
    pub fn clear_selection(&mut self) {
        self.active = None;
        self.state.lock().unwrap().clear_selection();
    }

    pub fn selected_conversation(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.conversation_id.as_str())
    }

    /// Send a message to the selected counterpart. On acknowledgment the
    /// message is appended to the local cache (optimistic, all roles); on
    /// failure nothing is appended and a `SendFailed` event fires.
    pub async fn send_message(&self, content: &str) -> Result<Message, StoreError> {
        let receiver_id = match &self.active {
            Some(view) => view.conversation_id.clone(),
            None => return Err(StoreError::Other("no conversation selected".into())),
        };

        match self.store.send_message(&receiver_id, content).await {
            Ok(message) => {
                self.state.lock().unwrap().append_sent(message.clone());
                let _ = self.events_tx.send(SyncEvent::MessageSent(message.clone()));
                let _ = self.events_tx.send(SyncEvent::ScrollToBottom);
                Ok(message)
            }
            Err(e) => {
                warn!(receiver_id = %receiver_id, error = %e, "Send failed");
                let _ = self.events_tx.send(SyncEvent::SendFailed {
                    reason: "Failed to send message".into(),
                });
                Err(e)
            }
        }
    }

    /// Server-side search within the selected conversation. Failures are
    /// logged and yield an empty result; the view simply shows nothing.
    pub async fn search(&self, query: &str) -> Vec<Message> {
        let user_id = match &self.active {
            Some(view) => view.conversation_id.clone(),
            None => return Vec::new(),
        };
        match self.store.search_messages(&user_id, query).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    /// Forward a composer keystroke to the typing notifier.
    pub fn keystroke(&self) {
        if let Some(view) = &self.active {
            view.typing.keystroke();
        }
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().unwrap().conversations().to_vec()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages().to_vec()
    }

    pub fn peer_status(&self, user_id: &str) -> PeerStatus {
        self.peers
            .get(user_id)
            .map(|entry| *entry.value())
            .unwrap_or_default()
    }

    /// Stop every poller. Dropping the session has the same effect.
    pub fn shutdown(&mut self) {
        self.active = None;
        self.conversation_poll.cancel();
    }
}
