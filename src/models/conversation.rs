use serde::{Deserialize, Serialize};

/// A chat counterpart plus the server-computed unread total. This is not a
/// stored thread object; the list is re-fetched wholesale on every poll tick.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub unread_count: u32,
}
