//! OnlySwap chat synchronization client.
//!
//! Keeps a local view of conversations and messages approximately consistent
//! with the remote REST message store by fixed-interval polling, detects new
//! arrivals, and surfaces them as events and transient notifications. No
//! websockets, no server push.

mod api;
mod events;
pub mod models;
mod notify;
mod store;
mod sync;

pub use api::HttpChatStore;
pub use events::SyncEvent;
pub use notify::NotificationPresenter;
pub use store::{ChatStore, StoreError};
pub use sync::{
    ChatSession, ConversationOutcome, MessageOutcome, PeerStatus, Poller, SessionConfig,
    SyncState, TypingNotifier,
};
