use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// One chat message, exactly as the server returns it. Messages arrive in
/// chronological ascending order and are never reordered or mutated locally.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: UserSummary,
    pub receiver: UserSummary,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether this message was authored by the given user.
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender.id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserializes_wire_format() {
        let json = r#"{
            "id": "m1",
            "sender": {"id": "u1", "name": "Alice", "email": "alice@campus.edu", "avatar": null},
            "receiver": {"id": "u2", "name": "Bob", "email": "bob@campus.edu", "avatar": "b.png"},
            "content": "Hi",
            "isRead": false,
            "createdAt": "2025-01-15T10:30:00Z"
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.sender.name, "Alice");
        assert_eq!(msg.receiver.avatar.as_deref(), Some("b.png"));
        assert!(!msg.is_read);
        assert!(msg.is_from("u1"));
        assert!(!msg.is_from("u2"));
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let json = r#"{
            "id": "m1",
            "sender": {"id": "u1", "name": "Alice", "email": "a@x.edu", "avatar": null},
            "receiver": {"id": "u2", "name": "Bob", "email": "b@x.edu", "avatar": null},
            "content": "Hi",
            "isRead": true,
            "createdAt": "2025-01-15T10:30:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        let out = serde_json::to_string(&msg).unwrap();
        assert!(out.contains("\"isRead\":true"));
        assert!(out.contains("\"createdAt\""));
        assert!(!out.contains("is_read"));
    }
}
