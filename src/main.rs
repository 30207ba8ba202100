use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use onlyswap_chat::{
    ChatSession, HttpChatStore, NotificationPresenter, SessionConfig, SyncEvent,
};

/// Headless watcher: connects to the OnlySwap backend, follows the first
/// conversation, and logs everything the sync client observes.
#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let _ = dotenvy::dotenv();

    let base_url =
        std::env::var("ONLYSWAP_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let token = match std::env::var("ONLYSWAP_TOKEN") {
        Ok(t) => t,
        Err(_) => {
            error!("ONLYSWAP_TOKEN is not set");
            std::process::exit(1);
        }
    };
    let self_id = match std::env::var("ONLYSWAP_SELF_ID") {
        Ok(id) => id,
        Err(_) => {
            error!("ONLYSWAP_SELF_ID is not set");
            std::process::exit(1);
        }
    };

    let store = match HttpChatStore::new(&base_url, &token) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    info!("Polling {} as user {}", base_url, self_id);

    let (mut session, mut events) =
        ChatSession::new(store, &self_id, SessionConfig::default());
    let presenter = NotificationPresenter::new();
    let mut banner = presenter.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                session.shutdown();
                break;
            }
            changed = banner.changed() => {
                if changed.is_ok() {
                    match banner.borrow().as_deref() {
                        Some(text) => info!("[banner] {}", text),
                        None => info!("[banner] dismissed"),
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SyncEvent::ConversationsUpdated(list) => {
                        info!("{} conversations", list.len());
                        if session.selected_conversation().is_none() {
                            if let Some(first) = list.first() {
                                session.select_conversation(&first.user_id);
                            }
                        }
                    }
                    SyncEvent::MessagesUpdated { conversation_id, messages } => {
                        info!("{}: {} messages", conversation_id, messages.len());
                    }
                    SyncEvent::NewMessage { sender, .. } => {
                        presenter.show(format!("New message from {}", sender.name));
                    }
                    SyncEvent::ScrollToBottom => {}
                    SyncEvent::TypingChanged { user_id, is_typing } => {
                        info!("{} typing: {}", user_id, is_typing);
                    }
                    SyncEvent::PresenceChanged { user_id, status } => {
                        info!("{} presence: {:?}", user_id, status);
                    }
                    SyncEvent::MessageSent(message) => {
                        info!("Sent {}", message.id);
                    }
                    SyncEvent::SendFailed { reason } => {
                        presenter.show(reason);
                    }
                }
            }
        }
    }
}
