//! HandleInbound - the dialogue engine's single entry point.
//!
//! Side effects happen in a fixed order:
//! 1. find the active conversation for the identity, or create one
//! 2. append the inbound message to the log (before any validation)
//! 3. compute the transition and, if it changed the conversation,
//!    write it back with a version check
//! 4. send each outbound message through the channel, in order
//! 5. append each sent message to the log
//!
//! A failed outbound append does not undo step 3: the user already saw the
//! reply. Store and channel failures are returned to the caller as-is.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::{Conversation, DialogueState, Message, OPTIONS, PROVIDER_MESSAGE_ID};
use crate::domain::dialogue::{DialogueFlow, Outcome, OutboundMessage, Transition};
use crate::domain::foundation::{ConversationId, DomainError, Identity, Timestamp};
use crate::ports::{ChannelError, ConversationStore, MessageLog, OutboundChannel, StoreError};

/// Default bound on re-reads after a version conflict.
pub const DEFAULT_MAX_CONFLICT_ATTEMPTS: u32 = 3;

/// Settings injected into the engine at construction.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub flow: DialogueFlow,
    /// Total attempts at the conditional update, including the first.
    pub max_conflict_attempts: u32,
}

impl EngineConfig {
    pub fn new(flow: DialogueFlow) -> Self {
        Self {
            flow,
            max_conflict_attempts: DEFAULT_MAX_CONFLICT_ATTEMPTS,
        }
    }

    pub fn with_max_conflict_attempts(mut self, attempts: u32) -> Self {
        self.max_conflict_attempts = attempts.max(1);
        self
    }
}

/// One inbound text from a user.
#[derive(Debug, Clone)]
pub struct HandleInboundCommand {
    pub identity: Identity,
    pub text: String,
    /// The provider's id for this message, kept in the log metadata.
    pub provider_message_id: Option<String>,
}

impl HandleInboundCommand {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleInboundResult {
    pub conversation_id: ConversationId,
    pub outcome: Outcome,
    pub state: DialogueState,
    /// Outbound messages delivered.
    pub sent: usize,
}

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("conversation store failed: {0}")]
    Store(StoreError),

    #[error("message log failed: {0}")]
    MessageLog(StoreError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] ChannelError),

    /// Messages reached the user but were not logged. State is kept.
    #[error("{failed} outbound message(s) delivered but not logged: {source}")]
    OutboundLog { failed: usize, source: StoreError },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl DialogueError {
    /// True when the failure came after the transition was persisted.
    ///
    /// Applying the same inbound message again would then advance the
    /// conversation a second time.
    pub fn transition_committed(&self) -> bool {
        matches!(self, Self::Delivery(_) | Self::OutboundLog { .. })
    }
}

/// Runs the intake flow against the ports.
pub struct DialogueEngine {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageLog>,
    channel: Arc<dyn OutboundChannel>,
    config: EngineConfig,
}

impl DialogueEngine {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageLog>,
        channel: Arc<dyn OutboundChannel>,
        config: EngineConfig,
    ) -> Self {
        Self {
            conversations,
            messages,
            channel,
            config,
        }
    }

    /// Processes one inbound text.
    pub async fn handle_inbound(
        &self,
        identity: &Identity,
        text: &str,
    ) -> Result<HandleInboundResult, DialogueError> {
        self.handle(HandleInboundCommand::new(identity.clone(), text)).await
    }

    pub async fn handle(&self, cmd: HandleInboundCommand) -> Result<HandleInboundResult, DialogueError> {
        let now = Timestamp::now();

        // 1. Load or create
        let conversation = self.load_or_create(&cmd.identity, now).await?;

        // 2. Log what the user sent, valid or not
        let mut inbound = Message::inbound(conversation.id(), cmd.identity.clone(), &cmd.text, now);
        if let Some(id) = &cmd.provider_message_id {
            inbound = inbound.with_metadata(PROVIDER_MESSAGE_ID, serde_json::json!(id));
        }
        self.messages
            .append(&inbound)
            .await
            .map_err(DialogueError::MessageLog)?;

        // 3. Transition and persist
        let transition = self.apply(conversation, &cmd.text, now).await?;
        let conversation = &transition.conversation;
        tracing::info!(
            identity = %cmd.identity,
            conversation_id = %conversation.id(),
            state = %conversation.state(),
            outcome = ?transition.outcome,
            "inbound message handled"
        );

        // 4 + 5. Deliver and log
        let mut unlogged = Vec::new();
        for outbound in &transition.outbound {
            self.deliver(&cmd.identity, outbound).await?;
            let record = outbound_record(conversation.id(), &cmd.identity, outbound);
            if let Err(e) = self.messages.append(&record).await {
                tracing::error!(
                    conversation_id = %conversation.id(),
                    "Outbound message delivered but not logged: {}",
                    e
                );
                unlogged.push(e);
            }
        }

        if let Some(source) = unlogged.first().cloned() {
            return Err(DialogueError::OutboundLog {
                failed: unlogged.len(),
                source,
            });
        }

        Ok(HandleInboundResult {
            conversation_id: conversation.id(),
            outcome: transition.outcome,
            state: conversation.state(),
            sent: transition.outbound.len(),
        })
    }

    async fn load_or_create(&self, identity: &Identity, now: Timestamp) -> Result<Conversation, DialogueError> {
        if let Some(existing) = self
            .conversations
            .find_active_by_identity(identity)
            .await
            .map_err(DialogueError::Store)?
        {
            return Ok(existing);
        }

        let conversation = Conversation::new(identity.clone(), now);
        match self.conversations.create(&conversation).await {
            Ok(_) => {
                tracing::info!(identity = %identity, conversation_id = %conversation.id(), "conversation started");
                Ok(conversation)
            }
            // Another process created it between our read and write
            Err(StoreError::AlreadyActive(_)) => self
                .conversations
                .find_active_by_identity(identity)
                .await
                .map_err(DialogueError::Store)?
                .ok_or_else(|| {
                    DialogueError::Store(StoreError::NotFound(format!("active conversation for {identity}")))
                }),
            Err(e) => Err(DialogueError::Store(e)),
        }
    }

    /// Computes the transition and writes it back, recomputing from a fresh
    /// read when another writer got there first.
    async fn apply(
        &self,
        mut conversation: Conversation,
        text: &str,
        now: Timestamp,
    ) -> Result<Transition, DialogueError> {
        let mut attempt = 1;
        loop {
            let transition = self.config.flow.transition(&conversation, text, now)?;
            if !transition.mutated() {
                return Ok(transition);
            }

            match self.conversations.update(&transition.conversation).await {
                Ok(()) => return Ok(transition),
                Err(StoreError::Conflict(subject)) if attempt < self.config.max_conflict_attempts => {
                    tracing::warn!(
                        conversation_id = %conversation.id(),
                        attempt,
                        "Version conflict on {}, recomputing",
                        subject
                    );
                    attempt += 1;
                    conversation = self
                        .conversations
                        .find_by_id(&conversation.id())
                        .await
                        .map_err(DialogueError::Store)?
                        .ok_or_else(|| DialogueError::Store(StoreError::NotFound(format!("conversation {}", conversation.id()))))?;
                }
                Err(e) => return Err(DialogueError::Store(e)),
            }
        }
    }

    async fn deliver(&self, to: &Identity, outbound: &OutboundMessage) -> Result<(), ChannelError> {
        match outbound {
            OutboundMessage::Text(text) => self.channel.send_text(to, text).await,
            OutboundMessage::Choices { text, options } => {
                self.channel.send_choices(to, text, options).await
            }
        }
    }
}

fn outbound_record(conversation_id: ConversationId, to: &Identity, outbound: &OutboundMessage) -> Message {
    let record = Message::outbound(conversation_id, to.clone(), outbound.text(), Timestamp::now());
    match outbound {
        OutboundMessage::Choices { options, .. } => record.with_metadata(OPTIONS, serde_json::json!(options)),
        OutboundMessage::Text(_) => record,
    }
}
