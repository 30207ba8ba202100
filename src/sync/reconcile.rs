use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{Conversation, Message, UserSummary};

/// Result of reconciling a conversation-list snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationOutcome {
    /// Response was older than the last-applied one; cache untouched.
    Stale,
    /// Snapshot equals the cache; no state write, no event.
    Unchanged,
    /// Cache replaced with the snapshot.
    Replaced(Vec<Conversation>),
}

/// Result of reconciling a message snapshot for the active conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// Stale sequence number or a snapshot for a no-longer-selected
    /// conversation; cache untouched.
    Discarded,
    Applied {
        messages: Vec<Message>,
        /// Set when new messages arrived and the latest one is from the
        /// counterpart; carries that sender for the notification.
        new_from: Option<UserSummary>,
        scroll: bool,
    },
}

/// Per-conversation sync bookkeeping, reset on every selection change.
struct ActiveSync {
    conversation_id: String,
    messages: Vec<Message>,
    last_seq: u64,
    /// Message count observed at the previous applied snapshot; the delta
    /// against it detects new arrivals.
    last_message_count: usize,
    /// The first snapshot after selection establishes the baseline and never
    /// notifies.
    primed: bool,
}

/// Reconciles fetched snapshots against cached state. Pure and synchronous;
/// the poll continuations drive it and turn its outcomes into events.
///
/// Every issued request takes a monotonic sequence number; responses arriving
/// out of order are discarded rather than overwriting newer data.
pub struct SyncState {
    self_id: String,
    next_seq: u64,
    conversations: Vec<Conversation>,
    last_conv_seq: u64,
    last_refresh: Option<DateTime<Utc>>,
    active: Option<ActiveSync>,
}

impl SyncState {
    pub fn new(self_id: &str) -> Self {
        Self {
            self_id: self_id.to_string(),
            next_seq: 0,
            conversations: Vec::new(),
            last_conv_seq: 0,
            last_refresh: None,
            active: None,
        }
    }

    /// Take a sequence number for an outgoing fetch.
    pub fn begin_request(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn messages(&self) -> &[Message] {
        self.active.as_ref().map(|a| a.messages.as_slice()).unwrap_or(&[])
    }

    pub fn active_conversation(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.conversation_id.as_str())
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Reconcile a conversation-list snapshot. The cache is replaced only when
    /// the snapshot differs structurally, so an identical poll is a no-op.
    pub fn apply_conversations(
        &mut self,
        seq: u64,
        snapshot: Vec<Conversation>,
    ) -> ConversationOutcome {
        if seq <= self.last_conv_seq {
            debug!(seq, last = self.last_conv_seq, "Discarding stale conversation snapshot");
            return ConversationOutcome::Stale;
        }
        self.last_conv_seq = seq;

        if snapshot == self.conversations {
            return ConversationOutcome::Unchanged;
        }
        self.conversations = snapshot.clone();
        self.last_refresh = Some(Utc::now());
        ConversationOutcome::Replaced(snapshot)
    }

    /// Switch the message view to a new counterpart, dropping the previous
    /// conversation's cache and baseline.
    pub fn select_conversation(&mut self, conversation_id: &str) {
        self.active = Some(ActiveSync {
            conversation_id: conversation_id.to_string(),
            messages: Vec::new(),
            last_seq: 0,
            last_message_count: 0,
            primed: false,
        });
    }

    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    /// Reconcile a message snapshot. The cache is replaced unconditionally
    /// (never merged) so the view always reflects the latest server truth.
    pub fn apply_messages(
        &mut self,
        seq: u64,
        conversation_id: &str,
        snapshot: Vec<Message>,
    ) -> MessageOutcome {
        let active = match self.active.as_mut() {
            Some(a) if a.conversation_id == conversation_id => a,
            _ => {
                debug!(conversation_id, "Discarding snapshot for unselected conversation");
                return MessageOutcome::Discarded;
            }
        };
        if seq <= active.last_seq {
            debug!(seq, last = active.last_seq, "Discarding stale message snapshot");
            return MessageOutcome::Discarded;
        }
        active.last_seq = seq;

        let count = snapshot.len();
        active.messages = snapshot.clone();

        if !active.primed {
            active.primed = true;
            active.last_message_count = count;
            return MessageOutcome::Applied {
                messages: snapshot,
                new_from: None,
                scroll: false,
            };
        }

        let mut new_from = None;
        let mut scroll = false;
        if count > active.last_message_count {
            if let Some(last) = snapshot.last() {
                if !last.is_from(&self.self_id) {
                    new_from = Some(last.sender.clone());
                    scroll = true;
                }
            }
        }
        active.last_message_count = count;

        MessageOutcome::Applied {
            messages: snapshot,
            new_from,
            scroll,
        }
    }

    /// Optimistically append a message that the server just acknowledged.
    /// Advances the baseline so the next poll does not re-count it.
    pub fn append_sent(&mut self, message: Message) -> bool {
        match self.active.as_mut() {
            Some(a) if a.conversation_id == message.receiver.id => {
                a.messages.push(message);
                a.last_message_count += 1;
                true
            }
            _ => false,
        }
    }
}
