use anyhow::{Result, anyhow};
use reqwest::Method;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;

use crate::models::{
    Conversation, ConversationsResponse, Message, MessagesResponse, SendMessageRequest,
    SendMessageResponse, SYSTEM_SENDER,
};

/// Conversation id of a direct thread; the same whichever side computes it.
pub fn dm_conversation_id(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("dm_{}_{}", first, second)
}

pub struct MessagingService {
    client: RosterApiClient,
}

impl MessagingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    /// Latest message per thread, newest first
    pub async fn conversations(&self, auth_token: &str) -> Result<Vec<Conversation>> {
        let response: ConversationsResponse = self.client.request(
            Method::GET,
            "/conversations",
            Some(auth_token),
            None,
        ).await?;

        Ok(response.conversations)
    }

    pub async fn messages(&self, conversation_id: &str, auth_token: &str) -> Result<Vec<Message>> {
        debug!("Fetching messages for conversation: {}", conversation_id);

        let path = format!("/messages/{}", urlencoding::encode(conversation_id));
        let response: MessagesResponse = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(response.messages)
    }

    pub async fn send(
        &self,
        to_user_id: &str,
        content: &str,
        auth_token: &str,
    ) -> Result<SendMessageResponse> {
        let to_user_id = to_user_id.trim();
        let content = content.trim();

        if to_user_id.is_empty() || content.is_empty() {
            return Err(anyhow!("Recipient and message are required"));
        }
        if to_user_id == SYSTEM_SENDER {
            return Err(anyhow!("Cannot reply to system messages"));
        }

        let body = serde_json::to_value(SendMessageRequest {
            to_user_id: to_user_id.to_string(),
            content: content.to_string(),
        })?;
        let response: SendMessageResponse = self.client.request(
            Method::POST,
            "/messages",
            Some(auth_token),
            Some(body),
        ).await?;

        info!("Message sent in {}", response.conversation_id);
        Ok(response)
    }
}
