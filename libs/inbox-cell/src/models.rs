use serde::{Deserialize, Serialize};

/// Sender id the API uses for automatic notices.
pub const SYSTEM_SENDER: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Conversation {
    /// System threads (`system_<user>`) carry shift notices and take no replies.
    pub fn is_system(&self) -> bool {
        self.conversation_id.starts_with("system_")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsResponse {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub conversation_id: String,
    pub from: String,
    pub to: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub system: bool,
}

impl Message {
    pub fn is_from(&self, user_id: &str) -> bool {
        self.from == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub to_user_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportListResponse {
    #[serde(default)]
    pub items: Vec<SupportTicket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub resolved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_messages_parse() {
        let message: Message = serde_json::from_value(json!({
            "_id": "abc",
            "conversation_id": "system_u1",
            "from": "system",
            "to": "u1",
            "content": "Ai fost programat in data de 2026-10-20 la SMURD Cluj.",
            "timestamp": "Tue, 20 Oct 2026 08:00:00 GMT",
            "system": true
        }))
        .unwrap();

        assert!(message.system);
        assert!(message.is_from(SYSTEM_SENDER));
        assert_eq!(message.id.as_deref(), Some("abc"));
    }

    #[test]
    fn system_threads_are_recognised() {
        let conversation = Conversation {
            conversation_id: "system_u1".into(),
            last_message: None,
            timestamp: None,
        };
        assert!(conversation.is_system());
    }
}
