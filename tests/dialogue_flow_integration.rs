//! Integration tests for the intake dialogue.
//!
//! These tests drive the dialogue engine end to end over the in-memory
//! adapters and assert on:
//! 1. Conversation state and recorded answers after each message
//! 2. What the user receives through the outbound channel
//! 3. What ends up in the message log
//! 4. The consultant lifecycle (assign, close, start over)

use std::sync::Arc;
use std::time::Duration;

use intake_bot::adapters::memory::{
    InMemoryConversationStore, InMemoryMessageLog, InMemoryProcessedMessageStore,
    RecordingChannel, SentMessage,
};
use intake_bot::application::{
    AssignConsultantCommand, AssignConsultantHandler, CloseConversationCommand,
    CloseConversationHandler, DialogueEngine, EngineConfig, GetTranscriptHandler,
    GetTranscriptQuery, InboundDispatcher, InboundMessage,
};
use intake_bot::domain::conversation::{
    Conversation, ConversationStatus, DialogueState, Direction, Selections, Step,
    PROVIDER_MESSAGE_ID,
};
use intake_bot::domain::dialogue::prompts::{
    COMPANY_TYPE_PROMPT, HANDOFF, INVALID_MAIN_MENU, SUMMARY_HEADER, THANK_YOU,
};
use intake_bot::domain::dialogue::{DialogueFlow, Outcome};
use intake_bot::domain::foundation::{ConsultantId, ConversationId, Identity, Timestamp};
use intake_bot::ports::{ConversationStore, MessageLog};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PHONE: &str = "5511999999999";

struct Harness {
    conversations: Arc<InMemoryConversationStore>,
    messages: Arc<InMemoryMessageLog>,
    processed: Arc<InMemoryProcessedMessageStore>,
    channel: Arc<RecordingChannel>,
    engine: Arc<DialogueEngine>,
}

impl Harness {
    fn new() -> Self {
        let conversations = Arc::new(InMemoryConversationStore::new());
        let messages = Arc::new(InMemoryMessageLog::new());
        let processed = Arc::new(InMemoryProcessedMessageStore::new());
        let channel = Arc::new(RecordingChannel::new());
        let engine = Arc::new(DialogueEngine::new(
            conversations.clone(),
            messages.clone(),
            channel.clone(),
            EngineConfig::new(DialogueFlow::default()),
        ));
        Self {
            conversations,
            messages,
            processed,
            channel,
            engine,
        }
    }

    fn dispatcher(&self) -> InboundDispatcher {
        InboundDispatcher::new(
            self.engine.clone(),
            self.processed.clone(),
            Duration::from_secs(5),
        )
    }

    async fn active(&self, identity: &Identity) -> Conversation {
        self.conversations
            .find_active_by_identity(identity)
            .await
            .unwrap()
            .expect("active conversation")
    }

    async fn log_of(&self, id: ConversationId) -> Vec<(Direction, String)> {
        self.messages
            .find_by_conversation(&id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| (m.direction, m.content))
            .collect()
    }

    /// Seeds an active conversation at `state` with the given answers.
    async fn seed(&self, identity: &Identity, state: DialogueState, answers: &[(Step, &str)]) -> ConversationId {
        let mut selections = Selections::new();
        for (step, answer) in answers {
            selections.insert(*step, *answer);
        }
        let now = Timestamp::now();
        let conversation = Conversation::reconstitute(
            ConversationId::new(),
            identity.clone(),
            ConversationStatus::Active,
            state,
            selections,
            None,
            now,
            now,
            None,
            0,
        );
        self.conversations.create(&conversation).await.unwrap()
    }
}

fn phone() -> Identity {
    Identity::parse(PHONE).unwrap()
}

// =============================================================================
// Walking the flow
// =============================================================================

#[tokio::test]
async fn first_message_creates_conversation_and_sends_welcome_menu() {
    let h = Harness::new();

    let result = h.engine.handle_inbound(&phone(), "hi").await.unwrap();

    assert_eq!(result.outcome, Outcome::Advanced);
    assert_eq!(result.state, DialogueState::MainMenu);
    assert_eq!(result.sent, 1);

    let conversation = h.active(&phone()).await;
    assert_eq!(conversation.id(), result.conversation_id);
    assert_eq!(conversation.state(), DialogueState::MainMenu);
    assert!(conversation.selections().is_empty());

    let sent = h.channel.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        SentMessage::Choices { to, text, options } => {
            assert_eq!(to, &phone());
            assert!(text.contains("A conta med"));
            assert_eq!(options.len(), 4);
            assert!(options[0].starts_with("1- "));
        }
        other => panic!("expected a choice message, got {:?}", other),
    }

    let log = h.log_of(result.conversation_id).await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], (Direction::Inbound, "hi".to_string()));
    assert_eq!(log[1].0, Direction::Outbound);
}

#[tokio::test]
async fn main_menu_option_two_asks_for_company_type() {
    let h = Harness::new();
    h.engine.handle_inbound(&phone(), "hi").await.unwrap();
    h.channel.clear().await;

    let result = h.engine.handle_inbound(&phone(), "2").await.unwrap();

    assert_eq!(result.state, DialogueState::CompanyTypeSelection);
    let conversation = h.active(&phone()).await;
    assert_eq!(conversation.selections().get(Step::MainMenu), Some("2"));

    let sent = h.channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text(), COMPANY_TYPE_PROMPT);
}

#[tokio::test]
async fn invalid_menu_choice_reprompts_and_still_logs_input() {
    let h = Harness::new();
    let first = h.engine.handle_inbound(&phone(), "hi").await.unwrap();
    h.channel.clear().await;

    let result = h.engine.handle_inbound(&phone(), "9").await.unwrap();

    assert_eq!(result.outcome, Outcome::Reprompted);
    assert_eq!(result.state, DialogueState::MainMenu);

    let conversation = h.active(&phone()).await;
    assert_eq!(conversation.state(), DialogueState::MainMenu);
    assert!(conversation.selections().is_empty());

    let sent = h.channel.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        SentMessage::Choices { text, options, .. } => {
            assert_eq!(text, INVALID_MAIN_MENU);
            assert_eq!(options.len(), 4);
        }
        other => panic!("expected the menu again, got {:?}", other),
    }

    let log = h.log_of(first.conversation_id).await;
    assert!(log.contains(&(Direction::Inbound, "9".to_string())));
}

#[tokio::test]
async fn city_answer_hands_off_with_summary_of_recorded_steps_only() {
    let h = Harness::new();
    h.seed(
        &phone(),
        DialogueState::CitySelection,
        &[(Step::MainMenu, "2"), (Step::State, "SP")],
    )
    .await;

    let result = h.engine.handle_inbound(&phone(), "São Paulo").await.unwrap();

    assert_eq!(result.state, DialogueState::WaitingForConsultant);
    assert_eq!(
        h.active(&phone()).await.selections().get(Step::City),
        Some("São Paulo")
    );

    let sent = h.channel.sent().await;
    assert_eq!(sent.len(), 2);
    let summary = sent[0].text();
    assert!(summary.starts_with(SUMMARY_HEADER));
    assert!(summary.contains("Opção escolhida: 2- "));
    assert!(summary.contains("Estado: SP - São Paulo"));
    assert!(summary.contains("Município: São Paulo"));
    assert!(!summary.contains("CRM:"));
    assert_eq!(sent[1].text(), THANK_YOU);
}

#[tokio::test]
async fn full_walk_records_every_answer_in_order() {
    let h = Harness::new();
    let inputs = ["oi", "2", "1", "sp", "Campinas"];
    let expected = [
        DialogueState::MainMenu,
        DialogueState::CompanyTypeSelection,
        DialogueState::StateSelection,
        DialogueState::CitySelection,
        DialogueState::WaitingForConsultant,
    ];

    for (input, state) in inputs.iter().zip(expected) {
        let result = h.engine.handle_inbound(&phone(), input).await.unwrap();
        assert_eq!(result.state, state, "after {:?}", input);
    }

    let conversation = h.active(&phone()).await;
    let answers: Vec<_> = conversation.selections().iter().collect();
    assert_eq!(
        answers,
        vec![
            (Step::MainMenu, "2"),
            (Step::CompanyType, "1"),
            (Step::State, "SP"),
            (Step::City, "Campinas"),
        ]
    );

    // Every inbound text is followed by its replies
    let log = h.log_of(conversation.id()).await;
    let inbound: Vec<_> = log
        .iter()
        .filter(|(d, _)| *d == Direction::Inbound)
        .map(|(_, c)| c.as_str())
        .collect();
    assert_eq!(inbound, inputs.to_vec());
    assert_eq!(log.len(), inputs.len() + 6);
    assert_eq!(log.last().map(|(_, c)| c.as_str()), Some(THANK_YOU));
}

#[tokio::test]
async fn main_menu_other_options_hand_off_directly() {
    let h = Harness::new();
    h.engine.handle_inbound(&phone(), "hi").await.unwrap();
    h.channel.clear().await;

    let result = h.engine.handle_inbound(&phone(), " 3 ").await.unwrap();

    assert_eq!(result.state, DialogueState::WaitingForConsultant);
    assert_eq!(h.active(&phone()).await.selections().get(Step::MainMenu), Some("3"));
    assert_eq!(h.channel.sent().await[0].text(), HANDOFF);
}

// =============================================================================
// Handoff and consultant lifecycle
// =============================================================================

#[tokio::test]
async fn waiting_user_gets_handoff_message_again() {
    let h = Harness::new();
    let id = h.seed(&phone(), DialogueState::WaitingForConsultant, &[(Step::MainMenu, "1")]).await;

    let result = h.engine.handle_inbound(&phone(), "alguém aí?").await.unwrap();

    assert_eq!(result.outcome, Outcome::Reaffirmed);
    assert_eq!(result.state, DialogueState::WaitingForConsultant);
    assert_eq!(h.channel.sent().await[0].text(), HANDOFF);
    assert_eq!(h.conversations.find_by_id(&id).await.unwrap().unwrap().version(), 0);
}

#[tokio::test]
async fn assigned_conversation_is_silent_and_closing_starts_over() {
    let h = Harness::new();
    let id = h.seed(&phone(), DialogueState::WaitingForConsultant, &[(Step::MainMenu, "1")]).await;

    let assigned = AssignConsultantHandler::new(h.conversations.clone())
        .handle(AssignConsultantCommand {
            conversation_id: id,
            consultant_id: ConsultantId::new("ana").unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(assigned.state(), DialogueState::ConsultantAssigned);

    let result = h.engine.handle_inbound(&phone(), "oi").await.unwrap();
    assert_eq!(result.outcome, Outcome::Ignored);
    assert_eq!(result.sent, 0);
    assert!(h.channel.sent().await.is_empty());

    let closed = CloseConversationHandler::new(h.conversations.clone())
        .handle(CloseConversationCommand { conversation_id: id })
        .await
        .unwrap();
    assert_eq!(closed.status(), ConversationStatus::Completed);
    assert!(closed.ended_at().is_some());

    let result = h.engine.handle_inbound(&phone(), "oi de novo").await.unwrap();
    assert_ne!(result.conversation_id, id);
    assert_eq!(result.state, DialogueState::MainMenu);
    assert_eq!(h.conversations.all_for_identity(&phone()).await.len(), 2);
}

#[tokio::test]
async fn transcript_returns_log_oldest_first_and_latest_window() {
    let h = Harness::new();
    for input in ["oi", "2", "9"] {
        h.engine.handle_inbound(&phone(), input).await.unwrap();
    }
    let id = h.active(&phone()).await.id();
    let handler = GetTranscriptHandler::new(h.conversations.clone(), h.messages.clone());

    let full = handler
        .handle(GetTranscriptQuery { conversation_id: id, latest: None })
        .await
        .unwrap();
    assert_eq!(full.messages.len(), 6);
    assert_eq!(full.messages[0].content, "oi");
    assert_eq!(full.conversation.state(), DialogueState::CompanyTypeSelection);

    let tail = handler
        .handle(GetTranscriptQuery { conversation_id: id, latest: Some(2) })
        .await
        .unwrap();
    let contents: Vec<_> = tail.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents[0], "9");
    assert_eq!(tail.messages[1].direction, Direction::Outbound);
}

// =============================================================================
// Dispatcher
// =============================================================================

#[tokio::test]
async fn redelivered_message_is_processed_once() {
    let h = Harness::new();
    let dispatcher = h.dispatcher();

    for _ in 0..2 {
        dispatcher.dispatch(InboundMessage::new(phone(), "oi").with_provider_message_id("wamid.1"));
    }
    dispatcher.shutdown().await;

    assert_eq!(h.channel.sent().await.len(), 1);
    let id = h.active(&phone()).await.id();
    let log = h.messages.find_by_conversation(&id).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].metadata.get(PROVIDER_MESSAGE_ID), Some(&serde_json::json!("wamid.1")));
    assert_eq!(h.processed.len().await, 1);
}

#[tokio::test]
async fn messages_from_one_identity_are_handled_in_arrival_order() {
    let h = Harness::new();
    let dispatcher = h.dispatcher();
    let other = Identity::parse("5521988887777").unwrap();

    for (n, text) in ["oi", "2", "1", "RJ"].iter().enumerate() {
        dispatcher.dispatch(InboundMessage::new(phone(), *text).with_provider_message_id(format!("a.{n}")));
        dispatcher.dispatch(InboundMessage::new(other.clone(), "oi").with_provider_message_id(format!("b.{n}")));
    }
    dispatcher.shutdown().await;

    let mine = h.active(&phone()).await;
    assert_eq!(mine.state(), DialogueState::CitySelection);
    assert_eq!(mine.selections().get(Step::State), Some("RJ"));

    // The other identity got a welcome, then three re-prompts of the menu
    let theirs = h.active(&other).await;
    assert_eq!(theirs.state(), DialogueState::MainMenu);
    assert_eq!(h.channel.sent_to(&other).await.len(), 4);
}
