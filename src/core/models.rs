// records the store hands out - serialized straight into api responses

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classify::ResponseType;

pub const ROLE_STUDENT: &str = "STUDENT";
pub const ROLE_TEACHER: &str = "TEACHER";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub is_public: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub members: Vec<User>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct GroupRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub is_public: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl GroupRow {
    pub fn with_members(self, members: Vec<User>) -> StudyGroup {
        StudyGroup {
            id: self.id,
            name: self.name,
            description: self.description,
            subject: self.subject,
            is_public: self.is_public,
            created_by: self.created_by,
            created_at: self.created_at,
            members,
        }
    }
}

pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub subject: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MessageType {
    Text,
    File,
    System,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub group_id: i64,
    pub sender: User,
    pub content: String,
    pub message_type: MessageType,
    pub sent_at: DateTime<Utc>,
}

// chat_messages joined with the sender
#[derive(sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub group_id: i64,
    pub content: String,
    pub message_type: MessageType,
    pub sent_at: DateTime<Utc>,
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
    pub user_created_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            group_id: row.group_id,
            content: row.content,
            message_type: row.message_type,
            sent_at: row.sent_at,
            sender: User {
                id: row.user_id,
                email: row.email,
                name: row.name,
                role: row.role,
                password_hash: row.password_hash,
                created_at: row.user_created_at,
            },
        }
    }
}

/// One question/answer pair from the tutor. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TutorExchange {
    pub id: i64,
    pub user_id: i64,
    pub group_id: Option<i64>,
    pub user_message: String,
    pub context: String,
    pub ai_response: String,
    pub response_type: ResponseType,
    pub created_at: DateTime<Utc>,
}

pub struct NewExchange {
    pub user_id: i64,
    pub group_id: Option<i64>,
    pub user_message: String,
    pub context: String,
    pub ai_response: String,
    pub response_type: ResponseType,
    pub created_at: DateTime<Utc>,
}
