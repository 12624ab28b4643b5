//! PostgreSQL adapters - Database implementations for the persistence ports.
//!
//! - `PostgresConversationStore` - Conversations with version-checked updates
//! - `PostgresMessageLog` - Append-only message log
//! - `PostgresProcessedMessageStore` - Webhook redelivery tracking
//!
//! Schema lives in `migrations/` and is applied by [`run_migrations`].

mod conversation_store;
mod message_log;
mod processed_message_store;

pub use conversation_store::PostgresConversationStore;
pub use message_log::PostgresMessageLog;
pub use processed_message_store::PostgresProcessedMessageStore;

use sqlx::PgPool;

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}
