use crate::models::{Conversation, Message, PresenceStatus, UserSummary};

/// Events emitted by the synchronization client for the embedding UI.
///
/// `MessagesUpdated` fires on every applied message snapshot (the cache is
/// replaced unconditionally); `ConversationsUpdated` fires only when the list
/// actually changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    ConversationsUpdated(Vec<Conversation>),
    MessagesUpdated {
        conversation_id: String,
        messages: Vec<Message>,
    },
    /// A message from the counterpart arrived since the last poll.
    NewMessage {
        conversation_id: String,
        sender: UserSummary,
    },
    ScrollToBottom,
    TypingChanged {
        user_id: String,
        is_typing: bool,
    },
    PresenceChanged {
        user_id: String,
        status: PresenceStatus,
    },
    MessageSent(Message),
    SendFailed {
        reason: String,
    },
}
