//! Chat conversation models.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// A chat thread between one user and the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConversation {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last activity timestamp (RFC 3339)
    pub updated_at: String,
}

impl ChatConversation {
    /// Create a new conversation.
    pub fn new(user_id: String, title: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// One message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Unique identifier
    pub id: String,
    /// Owning conversation
    pub conversation_id: String,
    /// Who wrote it
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl ChatMessage {
    /// Create a new message.
    pub fn new(conversation_id: String, role: MessageRole, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id,
            role,
            content,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
