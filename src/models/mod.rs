mod conversation;
mod message;
mod user;

pub use conversation::Conversation;
pub use message::Message;
pub use user::{PresenceStatus, UserSummary};
