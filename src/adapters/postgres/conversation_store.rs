//! PostgreSQL implementation of ConversationStore.
//!
//! Updates are conditional on the `version` column. The partial unique index
//! `conversations_one_active_per_identity` backs the one-active-per-identity
//! rule, so a racing `create` surfaces as a unique violation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Conversation, ConversationStatus, DialogueState, Selections};
use crate::domain::foundation::{ConsultantId, ConversationId, Identity, Timestamp};
use crate::ports::{ConversationStore, StoreError};

const SELECT_COLUMNS: &str = r#"
    SELECT id, identity, status, state, selections, consultant_id,
           started_at, last_updated_at, ended_at, version
    FROM conversations
"#;

#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn find_active_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE identity = $1 AND status = 'active'"))
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to fetch active conversation", e))?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn create(&self, conversation: &Conversation) -> Result<ConversationId, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO conversations (
                id, identity, status, state, selections, consultant_id,
                started_at, last_updated_at, ended_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(conversation.identity().as_str())
        .bind(conversation.status().as_str())
        .bind(conversation.state().as_str())
        .bind(selections_to_json(conversation.selections())?)
        .bind(conversation.consultant_id().map(|c| c.as_str().to_string()))
        .bind(conversation.started_at().as_datetime())
        .bind(conversation.last_updated_at().as_datetime())
        .bind(conversation.ended_at().map(|t| *t.as_datetime()))
        .bind(version_to_db(conversation.version()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(conversation.id()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::AlreadyActive(conversation.identity().to_string()))
            }
            Err(e) => Err(database("Failed to insert conversation", e)),
        }
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                status = $3,
                state = $4,
                selections = $5,
                consultant_id = $6,
                last_updated_at = $7,
                ended_at = $8,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(version_to_db(conversation.version()))
        .bind(conversation.status().as_str())
        .bind(conversation.state().as_str())
        .bind(selections_to_json(conversation.selections())?)
        .bind(conversation.consultant_id().map(|c| c.as_str().to_string()))
        .bind(conversation.last_updated_at().as_datetime())
        .bind(conversation.ended_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| database("Failed to update conversation", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Either gone or someone else moved the version on
        let exists = sqlx::query("SELECT 1 FROM conversations WHERE id = $1")
            .bind(conversation.id().as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to check conversation", e))?
            .is_some();

        if exists {
            Err(StoreError::Conflict(format!("conversation {}", conversation.id())))
        } else {
            Err(StoreError::NotFound(format!("conversation {}", conversation.id())))
        }
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database("Failed to fetch conversation", e))?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| database("Database ping failed", e))
    }
}

// === Helper Functions ===

pub(super) fn database(context: &str, err: sqlx::Error) -> StoreError {
    tracing::warn!("{}: {}", context, err);
    StoreError::Unavailable(format!("{}: {}", context, err))
}

fn corrupt(what: &str, detail: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("Invalid {} in storage: {}", what, detail))
}

fn version_to_db(version: u64) -> i64 {
    i64::try_from(version).unwrap_or(i64::MAX)
}

fn selections_to_json(selections: &Selections) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(selections).map_err(|e| corrupt("selections", e))
}

fn row_to_conversation(row: &PgRow) -> Result<Conversation, StoreError> {
    let get_err = |e: sqlx::Error| corrupt("conversation row", e);

    let id: uuid::Uuid = row.try_get("id").map_err(get_err)?;
    let identity: String = row.try_get("identity").map_err(get_err)?;
    let status: String = row.try_get("status").map_err(get_err)?;
    let state: String = row.try_get("state").map_err(get_err)?;
    let selections: serde_json::Value = row.try_get("selections").map_err(get_err)?;
    let consultant_id: Option<String> = row.try_get("consultant_id").map_err(get_err)?;
    let started_at: chrono::DateTime<chrono::Utc> = row.try_get("started_at").map_err(get_err)?;
    let last_updated_at: chrono::DateTime<chrono::Utc> =
        row.try_get("last_updated_at").map_err(get_err)?;
    let ended_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("ended_at").map_err(get_err)?;
    let version: i64 = row.try_get("version").map_err(get_err)?;

    let status: ConversationStatus = status.parse().map_err(|e| corrupt("status", e))?;
    let state: DialogueState = state.parse().map_err(|e| corrupt("state", e))?;
    let selections: Selections =
        serde_json::from_value(selections).map_err(|e| corrupt("selections", e))?;
    let consultant_id = consultant_id
        .map(ConsultantId::new)
        .transpose()
        .map_err(|e| corrupt("consultant_id", e))?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        Identity::from_trusted(identity),
        status,
        state,
        selections,
        consultant_id,
        Timestamp::from_datetime(started_at),
        Timestamp::from_datetime(last_updated_at),
        ended_at.map(Timestamp::from_datetime),
        u64::try_from(version).unwrap_or(0),
    ))
}
