//! Dialogue state machine.
//!
//! Defines where a conversation stands in the intake flow and which moves
//! between steps are legal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Step;
use crate::domain::foundation::{StateMachine, ValidationError};

/// Position of a conversation in the intake flow.
///
/// Conversations move forward through the questions until they are handed
/// to a human:
/// - `Initial`: created, welcome not sent yet
/// - `MainMenu` .. `CitySelection`: waiting for the answer to one question
/// - `WaitingForConsultant`: automated flow finished, awaiting a human
/// - `ConsultantAssigned`: a human owns the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Initial,
    MainMenu,
    CompanyTypeSelection,
    StateSelection,
    CitySelection,
    WaitingForConsultant,
    ConsultantAssigned,
}

impl DialogueState {
    pub const ALL: [DialogueState; 7] = [
        DialogueState::Initial,
        DialogueState::MainMenu,
        DialogueState::CompanyTypeSelection,
        DialogueState::StateSelection,
        DialogueState::CitySelection,
        DialogueState::WaitingForConsultant,
        DialogueState::ConsultantAssigned,
    ];

    /// The step whose answer this state is waiting for, if any.
    pub fn awaited_step(&self) -> Option<Step> {
        match self {
            Self::MainMenu => Some(Step::MainMenu),
            Self::CompanyTypeSelection => Some(Step::CompanyType),
            Self::StateSelection => Some(Step::State),
            Self::CitySelection => Some(Step::City),
            _ => None,
        }
    }

    /// Returns true once the automated flow has handed the user to a human.
    pub fn is_handed_off(&self) -> bool {
        matches!(self, Self::WaitingForConsultant | Self::ConsultantAssigned)
    }

    /// Stable identifier used in storage and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::MainMenu => "main_menu",
            Self::CompanyTypeSelection => "company_type_selection",
            Self::StateSelection => "state_selection",
            Self::CitySelection => "city_selection",
            Self::WaitingForConsultant => "waiting_for_consultant",
            Self::ConsultantAssigned => "consultant_assigned",
        }
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialogueState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("dialogue_state", format!("unknown state '{s}'")))
    }
}

impl StateMachine for DialogueState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogueState::*;
        matches!(
            (self, target),
            (Initial, MainMenu)
                | (MainMenu, CompanyTypeSelection)
                // Options 1, 3 and 4 skip straight to a human
                | (MainMenu, WaitingForConsultant)
                | (CompanyTypeSelection, StateSelection)
                | (StateSelection, CitySelection)
                | (CitySelection, WaitingForConsultant)
                | (WaitingForConsultant, ConsultantAssigned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueState::*;
        match self {
            Initial => vec![MainMenu],
            MainMenu => vec![CompanyTypeSelection, WaitingForConsultant],
            CompanyTypeSelection => vec![StateSelection],
            StateSelection => vec![CitySelection],
            CitySelection => vec![WaitingForConsultant],
            WaitingForConsultant => vec![ConsultantAssigned],
            ConsultantAssigned => vec![],
        }
    }
}
