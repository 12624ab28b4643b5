//! Shared application state for all HTTP handlers.

use std::sync::Arc;

use crate::application::{
    AssignConsultantHandler, CloseConversationHandler, GetTranscriptHandler, InboundDispatcher,
};
use crate::ports::{ConversationStore, MessageLog};

/// Cloned per request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<dyn ConversationStore>,
    pub messages: Arc<dyn MessageLog>,
    pub dispatcher: Arc<InboundDispatcher>,
    pub webhook_verify_token: Arc<str>,
}

impl AppState {
    pub fn assign_consultant_handler(&self) -> AssignConsultantHandler {
        AssignConsultantHandler::new(self.conversations.clone())
    }

    pub fn close_conversation_handler(&self) -> CloseConversationHandler {
        CloseConversationHandler::new(self.conversations.clone())
    }

    pub fn transcript_handler(&self) -> GetTranscriptHandler {
        GetTranscriptHandler::new(self.conversations.clone(), self.messages.clone())
    }
}
