/**
 * PostgreSQL Store
 *
 * Messages are rows of the `chat_messages` table created by the embedded
 * migrations under `migrations/`. Ordering is by `id`, which is the
 * increasing message id handed out by the chat log.
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{MessageStore, StoreError};
use crate::shared::{Message, MessageId};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    content: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let id = u64::try_from(row.id)
            .map_err(|_| StoreError::InvalidRecord(format!("negative message id {}", row.id)))?;

        Ok(Message {
            id: MessageId::new(id),
            content: row.content,
            username: row.username,
            created_at: row.created_at,
        })
    }
}

/// Messages stored in PostgreSQL
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to `database_url`
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_db_id(id: MessageId) -> Result<i64, StoreError> {
    i64::try_from(id.get())
        .map_err(|_| StoreError::InvalidRecord(format!("message id {} out of range", id)))
}

#[async_trait]
impl MessageStore for PostgresStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, content, username, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(to_db_id(message.id)?)
        .bind(&message.content)
        .bind(&message.username)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, content, username, created_at
            FROM chat_messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn trim(&self, keep: usize) -> Result<(), StoreError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        sqlx::query(
            r#"
            DELETE FROM chat_messages
            WHERE id NOT IN (
                SELECT id FROM chat_messages ORDER BY id DESC LIMIT $1
            )
            "#,
        )
        .bind(keep)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM chat_messages")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
