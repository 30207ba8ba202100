use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use onlyswap_chat::models::{Conversation, Message, PresenceStatus, UserSummary};
use onlyswap_chat::{ChatStore, StoreError};

/// One recorded store call, for asserting what the pollers actually fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Conversations,
    Messages(String),
    Send(String),
    Search(String, String),
    TypingStatus(String),
    SetTyping(String, bool),
    Presence(String),
}

/// In-memory stand-in for the remote message store. Resolves instantly and
/// records every call.
#[derive(Default)]
pub struct FakeStore {
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<HashMap<String, Vec<Message>>>,
    typing: Mutex<HashMap<String, bool>>,
    presence: Mutex<HashMap<String, PresenceStatus>>,
    calls: Mutex<Vec<Call>>,
    pub fail_send: AtomicBool,
    pub fail_messages: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_conversations(&self, list: Vec<Conversation>) {
        *self.conversations.lock().unwrap() = list;
    }

    pub fn push_message(&self, conversation_id: &str, message: Message) {
        self.messages
            .lock()
            .unwrap()
            .entry(conversation_id.to_string())
            .or_default()
            .push(message);
    }

    pub fn set_peer_typing(&self, user_id: &str, is_typing: bool) {
        self.typing
            .lock()
            .unwrap()
            .insert(user_id.to_string(), is_typing);
    }

    pub fn set_peer_presence(&self, user_id: &str, status: PresenceStatus) {
        self.presence
            .lock()
            .unwrap()
            .insert(user_id.to_string(), status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// The `isTyping` values published via `set_typing`, in order.
    pub fn published_typing(&self, user_id: &str) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetTyping(id, flag) if id == user_id => Some(flag),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatStore for FakeStore {
    async fn conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        self.record(Call::Conversations);
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        self.record(Call::Messages(user_id.to_string()));
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(StoreError::Other("injected failure".into()));
        }
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, receiver_id: &str, content: &str) -> Result<Message, StoreError> {
        self.record(Call::Send(receiver_id.to_string()));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(StoreError::Other("injected failure".into()));
        }
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            sender: user("me"),
            receiver: user(receiver_id),
            content: content.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.messages
            .lock()
            .unwrap()
            .entry(receiver_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn search_messages(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<Message>, StoreError> {
        self.record(Call::Search(user_id.to_string(), query.to_string()));
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(user_id)
            .map(|msgs| {
                msgs.iter()
                    .filter(|m| m.content.contains(query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn typing_status(&self, user_id: &str) -> Result<bool, StoreError> {
        self.record(Call::TypingStatus(user_id.to_string()));
        Ok(self
            .typing
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(false))
    }

    async fn set_typing(&self, user_id: &str, is_typing: bool) -> Result<(), StoreError> {
        self.record(Call::SetTyping(user_id.to_string(), is_typing));
        Ok(())
    }

    async fn presence(&self, user_id: &str) -> Result<PresenceStatus, StoreError> {
        self.record(Call::Presence(user_id.to_string()));
        Ok(self
            .presence
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(PresenceStatus::Offline))
    }
}

pub fn user(id: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{}@campus.edu", id),
        avatar: None,
    }
}

pub fn message(id: &str, from: &str, to: &str, content: &str) -> Message {
    Message {
        id: id.to_string(),
        sender: user(from),
        receiver: user(to),
        content: content.to_string(),
        is_read: false,
        created_at: Utc::now(),
    }
}

pub fn conversation(user_id: &str, unread: u32) -> Conversation {
    Conversation {
        user_id: user_id.to_string(),
        name: user_id.to_string(),
        email: format!("{}@campus.edu", user_id),
        unread_count: unread,
    }
}
