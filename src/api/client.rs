use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Conversation, Message, PresenceStatus};
use crate::store::{ChatStore, StoreError};

/// Per-request timeout. Polling must never hang on a single stalled request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP binding of [`ChatStore`] against the OnlySwap backend.
pub struct HttpChatStore {
    http: HttpClient,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ConversationsEnvelope {
    conversations: Vec<Conversation>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: Message,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypingEnvelope {
    is_typing: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresenceEnvelope {
    active_status: PresenceStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    receiver_id: &'a str,
    content: &'a str,
}

impl HttpChatStore {
    /// `base_url` is the server origin (no trailing `/api`); `token` is the
    /// bearer token acquired by the auth layer.
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let http = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).bearer_auth(&self.token).send().await?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ChatStore for HttpChatStore {
    async fn conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let env: ConversationsEnvelope = self.get_json("/api/chat/conversations").await?;
        Ok(env.conversations)
    }

    async fn messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let env: MessagesEnvelope = self
            .get_json(&format!("/api/chat/messages/{}", user_id))
            .await?;
        Ok(env.messages)
    }

    async fn send_message(&self, receiver_id: &str, content: &str) -> Result<Message, StoreError> {
        let url = self.url("/api/chat/messages");
        debug!(%url, receiver_id, "POST message");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&SendMessageBody {
                receiver_id,
                content,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status()));
        }
        let env: MessageEnvelope = resp.json().await?;
        Ok(env.message)
    }

    async fn search_messages(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<Message>, StoreError> {
        let url = self.url(&format!("/api/chat/messages/{}/search", user_id));
        debug!(%url, query, "GET search");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("query", query)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status()));
        }
        let env: MessagesEnvelope = resp.json().await?;
        Ok(env.messages)
    }

    async fn typing_status(&self, user_id: &str) -> Result<bool, StoreError> {
        let env: TypingEnvelope = self
            .get_json(&format!("/api/chat/typing/{}", user_id))
            .await?;
        Ok(env.is_typing)
    }

    async fn set_typing(&self, user_id: &str, is_typing: bool) -> Result<(), StoreError> {
        let url = self.url(&format!("/api/chat/typing/{}", user_id));
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&TypingEnvelope { is_typing })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status()));
        }
        Ok(())
    }

    async fn presence(&self, user_id: &str) -> Result<PresenceStatus, StoreError> {
        let env: PresenceEnvelope = self
            .get_json(&format!("/api/auth/user/{}/active", user_id))
            .await?;
        Ok(env.active_status)
    }
}
