//! InboundDispatcher - per-identity FIFO processing of inbound messages.
//!
//! Each identity gets one worker task fed by an unbounded queue. Messages
//! are enqueued synchronously in delivery order, so a single identity never
//! has two transitions in flight, while different identities proceed in
//! parallel. Workers exit after an idle period and are recreated on demand.
//!
//! Redeliveries are dropped by provider message id: an id is checked before
//! processing and marked once its transition is persisted, even when the
//! reply could not be delivered or logged afterwards. An id stays unmarked
//! only when nothing was written for it.
//!
//! No lock is held while a message is processed; the worker map lock only
//! guards enqueue and worker retirement.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::handlers::dialogue::{DialogueEngine, HandleInboundCommand};
use crate::domain::foundation::Identity;
use crate::ports::ProcessedMessageStore;

/// Default time a worker waits for its next message before exiting.
pub const DEFAULT_WORKER_IDLE: Duration = Duration::from_secs(300);

/// A validated inbound text, as decoded from the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub identity: Identity,
    pub text: String,
    pub provider_message_id: Option<String>,
}

impl InboundMessage {
    pub fn new(identity: Identity, text: impl Into<String>) -> Self {
        Self {
            identity,
            text: text.into(),
            provider_message_id: None,
        }
    }

    pub fn with_provider_message_id(mut self, id: impl Into<String>) -> Self {
        self.provider_message_id = Some(id.into());
        self
    }
}

struct Worker {
    generation: u64,
    queue: mpsc::UnboundedSender<InboundMessage>,
}

type WorkerMap = HashMap<Identity, Worker>;

struct Shared {
    engine: Arc<DialogueEngine>,
    processed: Arc<dyn ProcessedMessageStore>,
    workers: Mutex<WorkerMap>,
    idle_timeout: Duration,
}

impl Shared {
    fn workers(&self) -> MutexGuard<'_, WorkerMap> {
        // A panic while holding the lock cannot leave the map inconsistent
        self.workers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct InboundDispatcher {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    next_generation: AtomicU64,
}

impl InboundDispatcher {
    pub fn new(
        engine: Arc<DialogueEngine>,
        processed: Arc<dyn ProcessedMessageStore>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                engine,
                processed,
                workers: Mutex::new(HashMap::new()),
                idle_timeout,
            }),
            handles: Mutex::new(Vec::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Queues a message behind any earlier ones from the same identity.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, message: InboundMessage) {
        let mut workers = self.shared.workers();

        let message = match workers.get(&message.identity) {
            Some(worker) => match worker.queue.send(message) {
                Ok(()) => return,
                // Worker is gone; take the message back and start a new one
                Err(mpsc::error::SendError(message)) => message,
            },
            None => message,
        };

        let identity = message.identity.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        // Receiver is alive until the worker below drops it
        let _ = tx.send(message);
        workers.insert(identity.clone(), Worker { generation, queue: tx });
        drop(workers);

        tracing::debug!(identity = %identity, generation, "starting inbound worker");
        let handle = tokio::spawn(run_worker(self.shared.clone(), identity, generation, rx));

        let mut handles = self.handles.lock().unwrap_or_else(|p| p.into_inner());
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Number of identities with a live worker.
    pub fn active_workers(&self) -> usize {
        self.shared.workers().len()
    }

    /// Stops accepting work for current workers, lets them drain their
    /// queues, and waits for them to finish.
    pub async fn shutdown(&self) {
        self.shared.workers().clear();
        let handles = std::mem::take(&mut *self.handles.lock().unwrap_or_else(|p| p.into_inner()));
        tracing::info!(workers = handles.len(), "draining inbound workers");
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!("Inbound worker panicked: {}", e);
            }
        }
    }
}

async fn run_worker(
    shared: Arc<Shared>,
    identity: Identity,
    generation: u64,
    mut queue: mpsc::UnboundedReceiver<InboundMessage>,
) {
    loop {
        match tokio::time::timeout(shared.idle_timeout, queue.recv()).await {
            Ok(Some(message)) => process(&shared, message).await,
            // Dispatcher shut down and the queue is drained
            Ok(None) => break,
            Err(_idle) => {
                let late = {
                    let mut workers = shared.workers();
                    // Something may have been queued while the timer fired
                    let late = queue.try_recv().ok();
                    if late.is_none() && workers.get(&identity).map(|w| w.generation) == Some(generation) {
                        workers.remove(&identity);
                    }
                    late
                };
                match late {
                    Some(message) => process(&shared, message).await,
                    None => break,
                }
            }
        }
    }
    tracing::debug!(identity = %identity, generation, "inbound worker stopped");
}

async fn process(shared: &Shared, message: InboundMessage) {
    if let Some(id) = &message.provider_message_id {
        match shared.processed.contains(id).await {
            Ok(true) => {
                tracing::debug!(provider_message_id = %id, "Skipping redelivered message");
                return;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Redelivery check failed, processing anyway: {}", e),
        }
    }

    let mut cmd = HandleInboundCommand::new(message.identity.clone(), message.text);
    if let Some(id) = &message.provider_message_id {
        cmd = cmd.with_provider_message_id(id.clone());
    }

    let committed = match shared.engine.handle(cmd).await {
        Ok(_) => true,
        Err(e) if e.transition_committed() => {
            tracing::error!(identity = %message.identity, "Inbound message applied, reply incomplete: {}", e);
            true
        }
        Err(e) => {
            // The next message from this user retries from the last persisted state
            tracing::error!(identity = %message.identity, "Dropping inbound message: {}", e);
            false
        }
    };

    if committed {
        if let Some(id) = &message.provider_message_id {
            if let Err(e) = shared.processed.mark_processed(id).await {
                tracing::warn!(provider_message_id = %id, "Failed to mark message processed: {}", e);
            }
        }
    }
}
