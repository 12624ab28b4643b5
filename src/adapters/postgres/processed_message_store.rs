//! PostgreSQL implementation of ProcessedMessageStore.

use async_trait::async_trait;
use sqlx::PgPool;

use super::conversation_store::database;
use crate::domain::foundation::Timestamp;
use crate::ports::{ProcessedMessageStore, StoreError};

#[derive(Clone)]
pub struct PostgresProcessedMessageStore {
    pool: PgPool,
}

impl PostgresProcessedMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedMessageStore for PostgresProcessedMessageStore {
    async fn contains(&self, provider_message_id: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM processed_messages WHERE provider_message_id = $1")
            .bind(provider_message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to check processed message", e))?;

        Ok(row.is_some())
    }

    async fn mark_processed(&self, provider_message_id: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO processed_messages (provider_message_id, processed_at)
            VALUES ($1, $2)
            ON CONFLICT (provider_message_id) DO NOTHING
            "#,
        )
        .bind(provider_message_id)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| database("Failed to mark message processed", e))?;

        Ok(())
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM processed_messages WHERE processed_at < $1")
            .bind(timestamp.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| database("Failed to prune processed messages", e))?;

        Ok(result.rows_affected())
    }
}
