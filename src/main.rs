//! intake-bot server entry point.
//!
//! Wires configuration, adapters, the dialogue engine, and the HTTP router,
//! then serves until Ctrl-C or SIGTERM.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake_bot::adapters::http::{app_router, AppState};
use intake_bot::adapters::memory::{
    InMemoryConversationStore, InMemoryMessageLog, InMemoryProcessedMessageStore, RecordingChannel,
};
use intake_bot::adapters::postgres::{
    run_migrations, PostgresConversationStore, PostgresMessageLog, PostgresProcessedMessageStore,
};
use intake_bot::adapters::whatsapp::{CloudApiConfig, WhatsAppCloudChannel};
use intake_bot::application::{
    DialogueEngine, EngineConfig, InboundDispatcher, ProcessedMessagePruner, PrunerConfig,
};
use intake_bot::config::{AppConfig, DatabaseConfig, WhatsAppConfig};
use intake_bot::domain::dialogue::DialogueFlow;
use intake_bot::ports::{ConversationStore, MessageLog, OutboundChannel, ProcessedMessageStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

struct Stores {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageLog>,
    processed: Arc<dyn ProcessedMessageStore>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_logging(&config);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "intake-bot starting"
    );

    let stores = build_stores(&config.database).await?;
    let channel = build_channel(&config.whatsapp)?;

    let flow = DialogueFlow::new(config.dialogue.utc_offset());
    let engine = Arc::new(DialogueEngine::new(
        stores.conversations.clone(),
        stores.messages.clone(),
        channel,
        EngineConfig::new(flow).with_max_conflict_attempts(config.dialogue.max_conflict_attempts),
    ));
    let dispatcher = Arc::new(InboundDispatcher::new(
        engine,
        stores.processed.clone(),
        config.dialogue.worker_idle(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pruner = ProcessedMessagePruner::new(
        stores.processed.clone(),
        PrunerConfig::default()
            .with_retention(config.dialogue.processed_retention())
            .with_interval(config.dialogue.prune_interval()),
    );
    let pruner_task = tokio::spawn(async move { pruner.run(shutdown_rx).await });

    let state = AppState {
        conversations: stores.conversations,
        messages: stores.messages,
        dispatcher: dispatcher.clone(),
        webhook_verify_token: Arc::from(config.whatsapp.webhook_verify_token.as_str()),
    };
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, draining background work");
    let _ = shutdown_tx.send(true);
    let drain = async {
        dispatcher.shutdown().await;
        if let Err(e) = pruner_task.await {
            tracing::error!("Pruner task failed: {}", e);
        }
    };
    if tokio::time::timeout(config.server.shutdown_grace(), drain).await.is_err() {
        tracing::warn!("Shutdown grace period elapsed with work still pending");
    }

    tracing::info!("intake-bot stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).init();
    }
}

async fn build_stores(config: &DatabaseConfig) -> Result<Stores, BoxError> {
    let Some(url) = config.url() else {
        tracing::warn!("No database configured; conversations are kept in memory");
        return Ok(Stores {
            conversations: Arc::new(InMemoryConversationStore::new()),
            messages: Arc::new(InMemoryMessageLog::new()),
            processed: Arc::new(InMemoryProcessedMessageStore::new()),
        });
    };

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(url)
        .await?;
    tracing::info!("Connected to PostgreSQL");

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    Ok(Stores {
        conversations: Arc::new(PostgresConversationStore::new(pool.clone())),
        messages: Arc::new(PostgresMessageLog::new(pool.clone())),
        processed: Arc::new(PostgresProcessedMessageStore::new(pool)),
    })
}

fn build_channel(config: &WhatsAppConfig) -> Result<Arc<dyn OutboundChannel>, BoxError> {
    let Some((phone_number_id, token)) = config.credentials() else {
        tracing::warn!("WhatsApp credentials missing; replies are recorded, not sent");
        return Ok(Arc::new(RecordingChannel::new()));
    };

    let cloud = CloudApiConfig::new(phone_number_id, token.clone())
        .with_base_url(config.base_url.clone())
        .with_api_version(config.api_version.clone())
        .with_timeout(config.timeout());
    Ok(Arc::new(WhatsAppCloudChannel::new(cloud)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
