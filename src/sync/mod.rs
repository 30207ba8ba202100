mod poller;
mod reconcile;
mod session;
mod typing;

pub use poller::Poller;
pub use reconcile::{ConversationOutcome, MessageOutcome, SyncState};
pub use session::{ChatSession, PeerStatus, SessionConfig};
pub use typing::TypingNotifier;
