use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Conversation, Message, PresenceStatus};

/// Errors from the remote message store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("{0}")]
    Other(String),
}

/// The remote message store, consumed as opaque REST endpoints in production
/// and substituted with an in-memory fake in tests. The authoritative copy of
/// all conversations and messages lives behind this trait; the client only
/// caches snapshots.
#[async_trait]
pub trait ChatStore: Send + Sync + 'static {
    /// All conversations for the authenticated user, with unread totals.
    async fn conversations(&self) -> Result<Vec<Conversation>, StoreError>;

    /// Full message history with the given counterpart, chronological ascending.
    async fn messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError>;

    /// Send a message; the server assigns the id and timestamp.
    async fn send_message(&self, receiver_id: &str, content: &str) -> Result<Message, StoreError>;

    /// Server-side message search within one conversation.
    async fn search_messages(&self, user_id: &str, query: &str)
        -> Result<Vec<Message>, StoreError>;

    /// Whether the counterpart is currently typing.
    async fn typing_status(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Publish our own typing flag for the given conversation.
    async fn set_typing(&self, user_id: &str, is_typing: bool) -> Result<(), StoreError>;

    /// Online/offline status of the counterpart.
    async fn presence(&self, user_id: &str) -> Result<PresenceStatus, StoreError>;
}
