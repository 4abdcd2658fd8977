// sqlite store - users, sessions, groups, chat, tutor history
// migrations in ./migrations run on connect

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use super::models::{
    ChatMessage, GroupRow, MessageRow, MessageType, NewExchange, NewGroup, StudyGroup,
    TutorExchange, User,
};
use super::password;
use crate::Error;

const USER_COLUMNS: &str = "u.id AS id, u.email AS email, u.name AS name, u.role AS role, \
     u.password_hash AS password_hash, u.created_at AS created_at";

const MESSAGE_SELECT: &str = r#"SELECT m.id AS id, m.group_id AS group_id, m.content AS content,
           m.message_type AS message_type, m.sent_at AS sent_at,
           u.id AS user_id, u.email AS email, u.name AS name, u.role AS role,
           u.password_hash AS password_hash, u.created_at AS user_created_at
    FROM chat_messages m
    JOIN users u ON u.id = m.user_id"#;

/// Days a bearer token stays valid after it is issued.
pub const SESSION_TTL_DAYS: i64 = 7;

fn session_cutoff() -> DateTime<Utc> {
    Utc::now() - Duration::days(SESSION_TTL_DAYS)
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // every connection to :memory: is its own database, so keep exactly one alive
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(url, "database ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // wipe everything, children first
    pub async fn clear(&self) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        for table in [
            "chat_messages",
            "tutor_exchanges",
            "group_members",
            "study_groups",
            "sessions",
            "users",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // users

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: &str,
        password: &str,
    ) -> Result<User, Error> {
        let password_hash = password::hash(password)?;

        let user = sqlx::query_as(
            r#"INSERT INTO users (email, name, role, password_hash, created_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id, email, name, role, password_hash, created_at"#,
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, Error> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    // sessions

    /// Issue a new token. Expired sessions are pruned on the way.
    pub async fn create_session(&self, user_id: i64) -> Result<String, Error> {
        let token = uuid::Uuid::new_v4().to_string();
        let pruned = sqlx::query("DELETE FROM sessions WHERE created_at < ?")
            .bind(session_cutoff())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if pruned > 0 {
            debug!(pruned, "expired sessions removed");
        }

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    pub async fn user_for_session(&self, token: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as(&format!(
            r#"SELECT {USER_COLUMNS}
               FROM sessions s JOIN users u ON u.id = s.user_id
               WHERE s.token = ? AND s.created_at >= ?"#
        ))
        .bind(token)
        .bind(session_cutoff())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // groups

    pub async fn create_group(&self, group: NewGroup, creator: &User) -> Result<StudyGroup, Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row: GroupRow = sqlx::query_as(
            r#"INSERT INTO study_groups (name, description, subject, is_public, created_by, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING id, name, description, subject, is_public, created_by, created_at"#,
        )
        .bind(&group.name)
        .bind(&group.description)
        .bind(&group.subject)
        .bind(group.is_public)
        .bind(creator.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        // the creator always starts out as a member
        sqlx::query("INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?, ?, ?)")
            .bind(row.id)
            .bind(creator.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.with_members(vec![creator.clone()]))
    }

    pub async fn group(&self, id: i64) -> Result<Option<StudyGroup>, Error> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"SELECT id, name, description, subject, is_public, created_by, created_at
               FROM study_groups WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_members(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn group_exists(&self, id: i64) -> Result<bool, Error> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM study_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn public_groups(&self) -> Result<Vec<StudyGroup>, Error> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"SELECT id, name, description, subject, is_public, created_by, created_at
               FROM study_groups WHERE is_public = 1 ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_all_members(rows).await
    }

    pub async fn groups_for_member(&self, user_id: i64) -> Result<Vec<StudyGroup>, Error> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"SELECT g.id AS id, g.name AS name, g.description AS description,
                      g.subject AS subject, g.is_public AS is_public,
                      g.created_by AS created_by, g.created_at AS created_at
               FROM study_groups g
               JOIN group_members gm ON gm.group_id = g.id
               WHERE gm.user_id = ?
               ORDER BY g.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.load_all_members(rows).await
    }

    /// Add a member. Joining twice is a no-op.
    pub async fn add_member(&self, group_id: i64, user_id: i64) -> Result<(), Error> {
        sqlx::query(
            "INSERT OR IGNORE INTO group_members (group_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_members(&self, row: GroupRow) -> Result<StudyGroup, Error> {
        let members = sqlx::query_as(&format!(
            r#"SELECT {USER_COLUMNS}
               FROM group_members gm JOIN users u ON u.id = gm.user_id
               WHERE gm.group_id = ?
               ORDER BY gm.joined_at, u.id"#
        ))
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(row.with_members(members))
    }

    async fn load_all_members(&self, rows: Vec<GroupRow>) -> Result<Vec<StudyGroup>, Error> {
        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            groups.push(self.load_members(row).await?);
        }
        Ok(groups)
    }

    // chat

    /// Messages for a group, oldest first.
    pub async fn messages(&self, group_id: i64) -> Result<Vec<ChatMessage>, Error> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "{MESSAGE_SELECT} WHERE m.group_id = ? ORDER BY m.sent_at ASC, m.id ASC"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    pub async fn add_message(
        &self,
        group_id: i64,
        sender_id: i64,
        content: &str,
        message_type: MessageType,
        sent_at: DateTime<Utc>,
    ) -> Result<ChatMessage, Error> {
        let (id,): (i64,) = sqlx::query_as(
            r#"INSERT INTO chat_messages (group_id, user_id, content, message_type, sent_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(group_id)
        .bind(sender_id)
        .bind(content)
        .bind(message_type)
        .bind(sent_at)
        .fetch_one(&self.pool)
        .await?;

        let row: MessageRow = sqlx::query_as(&format!("{MESSAGE_SELECT} WHERE m.id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    // tutor history

    pub async fn record_exchange(&self, exchange: NewExchange) -> Result<TutorExchange, Error> {
        let saved = sqlx::query_as(
            r#"INSERT INTO tutor_exchanges
                   (user_id, group_id, user_message, context, ai_response, response_type, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING id, user_id, group_id, user_message, context, ai_response, response_type, created_at"#,
        )
        .bind(exchange.user_id)
        .bind(exchange.group_id)
        .bind(&exchange.user_message)
        .bind(&exchange.context)
        .bind(&exchange.ai_response)
        .bind(exchange.response_type)
        .bind(exchange.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// A user's tutor history, newest first.
    pub async fn exchanges_for_user(&self, user_id: i64) -> Result<Vec<TutorExchange>, Error> {
        let exchanges = sqlx::query_as(
            r#"SELECT id, user_id, group_id, user_message, context, ai_response, response_type, created_at
               FROM tutor_exchanges
               WHERE user_id = ?
               ORDER BY created_at DESC, id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exchanges)
    }
}
