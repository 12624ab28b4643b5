//! Conversation entity - one guided intake session with one user.

use super::{ConversationStatus, DialogueState, Selections, Step};
use crate::domain::foundation::{
    ConsultantId, ConversationId, DomainError, ErrorCode, Identity, StateMachine, Timestamp,
};

/// Conversation entity.
///
/// Tracks where the user is in the intake flow and what they answered.
/// `version` is owned by the store: it is the value read from persistence
/// and is checked on every conditional update.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: ConversationId,
    identity: Identity,
    status: ConversationStatus,
    state: DialogueState,
    selections: Selections,
    consultant_id: Option<ConsultantId>,
    started_at: Timestamp,
    last_updated_at: Timestamp,
    ended_at: Option<Timestamp>,
    version: u64,
}

impl Conversation {
    /// Creates a new active conversation in the `Initial` state.
    pub fn new(identity: Identity, now: Timestamp) -> Self {
        Self {
            id: ConversationId::new(),
            identity,
            status: ConversationStatus::Active,
            state: DialogueState::Initial,
            selections: Selections::new(),
            consultant_id: None,
            started_at: now,
            last_updated_at: now,
            ended_at: None,
            version: 0,
        }
    }

    /// Reconstitutes a conversation from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConversationId,
        identity: Identity,
        status: ConversationStatus,
        state: DialogueState,
        selections: Selections,
        consultant_id: Option<ConsultantId>,
        started_at: Timestamp,
        last_updated_at: Timestamp,
        ended_at: Option<Timestamp>,
        version: u64,
    ) -> Self {
        Self {
            id,
            identity,
            status,
            state,
            selections,
            consultant_id,
            started_at,
            last_updated_at,
            ended_at,
            version,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn consultant_id(&self) -> Option<&ConsultantId> {
        self.consultant_id.as_ref()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn last_updated_at(&self) -> Timestamp {
        self.last_updated_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_active(&self) -> bool {
        self.status == ConversationStatus::Active
    }

    // === Dialogue ===

    /// Moves to the next dialogue state.
    pub fn advance_to(&mut self, target: DialogueState, now: Timestamp) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.state = self.state.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {} to {}", self.state, target),
            )
        })?;
        self.last_updated_at = now;
        Ok(())
    }

    /// Records a validated answer for a step.
    pub fn record_selection(&mut self, step: Step, answer: impl Into<String>, now: Timestamp) {
        self.selections.insert(step, answer);
        self.last_updated_at = now;
    }

    // === Consultant handoff ===

    /// Hands a waiting conversation to a human consultant.
    pub fn assign_consultant(
        &mut self,
        consultant_id: ConsultantId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if self.state != DialogueState::WaitingForConsultant {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot assign a consultant while in {}", self.state),
            )
            .with_detail("state", self.state.as_str()));
        }
        self.advance_to(DialogueState::ConsultantAssigned, now)?;
        self.consultant_id = Some(consultant_id);
        Ok(())
    }

    /// Closes the conversation. A later message from the same identity
    /// starts a new one.
    pub fn complete(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(ConversationStatus::Completed)
            .map_err(|_| {
                DomainError::new(ErrorCode::ConversationClosed, "Conversation is already completed")
            })?;
        self.ended_at = Some(now);
        self.last_updated_at = now;
        Ok(())
    }

    /// Copy of this conversation as the store holds it after an update.
    pub fn with_next_version(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if !self.status.is_open() {
            return Err(DomainError::new(
                ErrorCode::ConversationClosed,
                format!("Conversation {} is completed", self.id),
            ));
        }
        Ok(())
    }
}
