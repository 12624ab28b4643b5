//! The intake flow as a pure function of (conversation, input, time).

use chrono::{FixedOffset, Offset, Utc};

use super::prompts::{
    company_type_lines, greeting_for_hour, main_menu_lines, welcome_text, CITY_PROMPT,
    COMPANY_TYPE_PROMPT, HANDOFF, INVALID_CITY, INVALID_COMPANY_TYPE, INVALID_MAIN_MENU,
    INVALID_STATE, STATE_PROMPT, THANK_YOU,
};
use super::summary::render_summary;
use crate::domain::conversation::{Conversation, DialogueState, Step};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::validation::{
    company_type_options, main_menu_options, menu_keys, validate_city_name, validate_menu_choice,
    RegionCode,
};

/// A message the flow wants delivered, in the order it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    Choices { text: String, options: Vec<String> },
}

impl OutboundMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Choices { text, .. } => text,
        }
    }
}

/// How the conversation reacted to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Answer accepted (or welcome sent); the conversation changed.
    Advanced,
    /// Answer rejected; state and selections untouched, one re-prompt sent.
    Reprompted,
    /// Already waiting for a human; the handoff message is repeated.
    Reaffirmed,
    /// A human owns the conversation, or it is closed; nothing is sent.
    Ignored,
}

/// Result of applying one inbound message.
#[derive(Debug, Clone)]
pub struct Transition {
    pub outcome: Outcome,
    pub conversation: Conversation,
    pub outbound: Vec<OutboundMessage>,
}

impl Transition {
    /// True when the conversation must be written back.
    pub fn mutated(&self) -> bool {
        self.outcome == Outcome::Advanced
    }

    fn unchanged(outcome: Outcome, conversation: &Conversation, outbound: Vec<OutboundMessage>) -> Self {
        Self {
            outcome,
            conversation: conversation.clone(),
            outbound,
        }
    }
}

/// Brasília time (UTC-3).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// The intake dialogue.
#[derive(Debug, Clone, Copy)]
pub struct DialogueFlow {
    utc_offset: FixedOffset,
}

impl Default for DialogueFlow {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix());
        Self::new(offset)
    }
}

impl DialogueFlow {
    /// `utc_offset` is the users' local time zone, used to pick the greeting.
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Applies `input` to `conversation`.
    ///
    /// The input is consumed without validation in `Initial`, where it only
    /// triggers the welcome. Elsewhere it is validated first; invalid input
    /// yields exactly one re-prompt and an unchanged conversation.
    pub fn transition(
        &self,
        conversation: &Conversation,
        input: &str,
        now: Timestamp,
    ) -> Result<Transition, DomainError> {
        if !conversation.is_active() {
            return Ok(Transition::unchanged(Outcome::Ignored, conversation, vec![]));
        }

        let answer = input.trim();
        match conversation.state() {
            DialogueState::Initial => {
                let greeting = greeting_for_hour(now.local_hour(self.utc_offset));
                self.advance(
                    conversation,
                    None,
                    DialogueState::MainMenu,
                    now,
                    vec![OutboundMessage::Choices {
                        text: welcome_text(greeting),
                        options: main_menu_lines(),
                    }],
                )
            }
            DialogueState::MainMenu => {
                if !validate_menu_choice(answer, &menu_keys(main_menu_options())) {
                    return Ok(reprompt(
                        conversation,
                        OutboundMessage::Choices {
                            text: INVALID_MAIN_MENU.to_string(),
                            options: main_menu_lines(),
                        },
                    ));
                }
                if answer == "2" {
                    self.advance(
                        conversation,
                        Some((Step::MainMenu, answer.to_string())),
                        DialogueState::CompanyTypeSelection,
                        now,
                        vec![OutboundMessage::Choices {
                            text: COMPANY_TYPE_PROMPT.to_string(),
                            options: company_type_lines(),
                        }],
                    )
                } else {
                    self.advance(
                        conversation,
                        Some((Step::MainMenu, answer.to_string())),
                        DialogueState::WaitingForConsultant,
                        now,
                        vec![OutboundMessage::Text(HANDOFF.to_string())],
                    )
                }
            }
            DialogueState::CompanyTypeSelection => {
                if !validate_menu_choice(answer, &menu_keys(company_type_options())) {
                    return Ok(reprompt(
                        conversation,
                        OutboundMessage::Choices {
                            text: INVALID_COMPANY_TYPE.to_string(),
                            options: company_type_lines(),
                        },
                    ));
                }
                self.advance(
                    conversation,
                    Some((Step::CompanyType, answer.to_string())),
                    DialogueState::StateSelection,
                    now,
                    vec![OutboundMessage::Text(STATE_PROMPT.to_string())],
                )
            }
            DialogueState::StateSelection => match RegionCode::parse(answer) {
                Some(region) => self.advance(
                    conversation,
                    Some((Step::State, region.code().to_string())),
                    DialogueState::CitySelection,
                    now,
                    vec![OutboundMessage::Text(CITY_PROMPT.to_string())],
                ),
                None => Ok(reprompt(
                    conversation,
                    OutboundMessage::Text(INVALID_STATE.to_string()),
                )),
            },
            DialogueState::CitySelection => {
                if !validate_city_name(answer) {
                    return Ok(reprompt(
                        conversation,
                        OutboundMessage::Text(INVALID_CITY.to_string()),
                    ));
                }
                let mut next = conversation.clone();
                next.record_selection(Step::City, answer, now);
                next.advance_to(DialogueState::WaitingForConsultant, now)?;
                let summary = render_summary(next.selections());
                Ok(Transition {
                    outcome: Outcome::Advanced,
                    conversation: next,
                    outbound: vec![
                        OutboundMessage::Text(summary),
                        OutboundMessage::Text(THANK_YOU.to_string()),
                    ],
                })
            }
            DialogueState::WaitingForConsultant => Ok(Transition::unchanged(
                Outcome::Reaffirmed,
                conversation,
                vec![OutboundMessage::Text(HANDOFF.to_string())],
            )),
            DialogueState::ConsultantAssigned => {
                Ok(Transition::unchanged(Outcome::Ignored, conversation, vec![]))
            }
        }
    }

    fn advance(
        &self,
        conversation: &Conversation,
        record: Option<(Step, String)>,
        target: DialogueState,
        now: Timestamp,
        outbound: Vec<OutboundMessage>,
    ) -> Result<Transition, DomainError> {
        let mut next = conversation.clone();
        if let Some((step, answer)) = record {
            next.record_selection(step, answer, now);
        }
        next.advance_to(target, now)?;
        Ok(Transition {
            outcome: Outcome::Advanced,
            conversation: next,
            outbound,
        })
    }
}

fn reprompt(conversation: &Conversation, message: OutboundMessage) -> Transition {
    Transition::unchanged(Outcome::Reprompted, conversation, vec![message])
}
