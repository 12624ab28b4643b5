//! PostgreSQL implementation of MessageLog.
//!
//! Rows are ordered by `sent_at`, then by the `seq` identity column so that
//! messages written in the same instant keep their append order.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::conversation_store::database;
use crate::domain::conversation::{Direction, Message, MessageKind, MessageMetadata};
use crate::domain::foundation::{ConversationId, Identity, MessageId, Timestamp};
use crate::ports::{MessageLog, StoreError};

#[derive(Clone)]
pub struct PostgresMessageLog {
    pool: PgPool,
}

impl PostgresMessageLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageLog for PostgresMessageLog {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        let metadata = serde_json::to_value(&message.metadata)
            .map_err(|e| StoreError::Unavailable(format!("Invalid message metadata: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, conversation_id, identity, content, direction, kind, sent_at, metadata
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.conversation_id.as_uuid())
        .bind(message.identity.as_str())
        .bind(&message.content)
        .bind(message.direction.as_str())
        .bind(message.kind.as_str())
        .bind(message.timestamp.as_datetime())
        .bind(metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| database("Failed to insert message", e))?;

        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, identity, content, direction, kind, sent_at, metadata
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at ASC, seq ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database("Failed to fetch messages", e))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn find_latest_by_conversation(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, identity, content, direction, kind, sent_at, metadata
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at DESC, seq DESC
            LIMIT $2
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database("Failed to fetch latest messages", e))?;

        rows.iter().map(row_to_message).collect()
    }
}

fn row_to_message(row: &PgRow) -> Result<Message, StoreError> {
    let corrupt = |what: &str, e: &dyn std::fmt::Display| {
        StoreError::Unavailable(format!("Invalid {} in storage: {}", what, e))
    };

    let id: uuid::Uuid = row.try_get("id").map_err(|e| corrupt("message row", &e))?;
    let conversation_id: uuid::Uuid =
        row.try_get("conversation_id").map_err(|e| corrupt("message row", &e))?;
    let identity: String = row.try_get("identity").map_err(|e| corrupt("message row", &e))?;
    let content: String = row.try_get("content").map_err(|e| corrupt("message row", &e))?;
    let direction: String = row.try_get("direction").map_err(|e| corrupt("message row", &e))?;
    let kind: String = row.try_get("kind").map_err(|e| corrupt("message row", &e))?;
    let sent_at: chrono::DateTime<chrono::Utc> =
        row.try_get("sent_at").map_err(|e| corrupt("message row", &e))?;
    let metadata: serde_json::Value =
        row.try_get("metadata").map_err(|e| corrupt("message row", &e))?;

    let metadata: MessageMetadata =
        serde_json::from_value(metadata).map_err(|e| corrupt("metadata", &e))?;

    Ok(Message {
        id: MessageId::from_uuid(id),
        conversation_id: ConversationId::from_uuid(conversation_id),
        identity: Identity::from_trusted(identity),
        content,
        direction: Direction::parse(&direction).map_err(|e| corrupt("direction", &e))?,
        kind: MessageKind::parse(&kind).map_err(|e| corrupt("kind", &e))?,
        timestamp: Timestamp::from_datetime(sent_at),
        metadata,
    })
}
