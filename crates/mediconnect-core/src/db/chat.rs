//! Chat conversation database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{ChatConversation, ChatMessage, MessageRole};

impl Database {
    /// Insert a new conversation.
    pub fn insert_conversation(&self, conversation: &ChatConversation) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO chat_conversations (id, user_id, title, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                conversation.id,
                conversation.user_id,
                conversation.title,
                conversation.created_at,
                conversation.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a conversation by id.
    pub fn get_conversation(&self, id: &str) -> DbResult<Option<ChatConversation>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, user_id, title, created_at, updated_at
                FROM chat_conversations
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(ChatConversation {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Append a message to its conversation and touch the
    /// conversation's updated_at.
    pub fn insert_message(&self, message: &ChatMessage) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO chat_messages (id, conversation_id, role, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                message.id,
                message.conversation_id,
                role_to_string(&message.role),
                message.content,
                message.created_at,
            ],
        )?;
        tx.execute(
            "UPDATE chat_conversations SET updated_at = datetime('now') WHERE id = ?",
            [&message.conversation_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// List a conversation's messages, oldest first.
    pub fn list_messages(&self, conversation_id: &str) -> DbResult<Vec<ChatMessage>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, conversation_id, role, content, created_at
            FROM chat_messages
            WHERE conversation_id = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([conversation_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                conversation_id: row.get(1)?,
                role: row.get(2)?,
                content: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?.try_into()?);
        }
        Ok(messages)
    }
}

/// Intermediate row struct for database mapping.
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl TryFrom<MessageRow> for ChatMessage {
    type Error = DbError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(ChatMessage {
            id: row.id,
            conversation_id: row.conversation_id,
            role: string_to_role(&row.role)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

fn role_to_string(role: &MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

fn string_to_role(s: &str) -> Result<MessageRole, DbError> {
    match s {
        "user" => Ok(MessageRole::User),
        "assistant" => Ok(MessageRole::Assistant),
        _ => Err(DbError::Constraint(format!("Unknown message role: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_and_messages() {
        let db = Database::open_in_memory().unwrap();

        let conversation = ChatConversation::new("user1".into(), "Conversation santé".into());
        db.insert_conversation(&conversation).unwrap();

        db.insert_message(&ChatMessage::new(
            conversation.id.clone(),
            MessageRole::User,
            "bonjour".into(),
        ))
        .unwrap();
        db.insert_message(&ChatMessage::new(
            conversation.id.clone(),
            MessageRole::Assistant,
            "Bonjour !".into(),
        ))
        .unwrap();

        let messages = db.list_messages(&conversation.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0].role, MessageRole::User));
        assert!(matches!(messages[1].role, MessageRole::Assistant));
        assert_eq!(messages[1].content, "Bonjour !");
    }

    #[test]
    fn test_get_conversation() {
        let db = Database::open_in_memory().unwrap();

        let conversation = ChatConversation::new("user1".into(), "Conversation santé".into());
        db.insert_conversation(&conversation).unwrap();

        let retrieved = db.get_conversation(&conversation.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Conversation santé");

        assert!(db.get_conversation("missing").unwrap().is_none());
    }
}
