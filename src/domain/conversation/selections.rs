//! Recorded answers, keyed by dialogue step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A question in the intake flow.
///
/// Variant order is flow order, so iterating `Selections` visits answers in
/// the order they were asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    MainMenu,
    CompanyType,
    State,
    City,
}

impl Step {
    /// Stable key used in storage.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::CompanyType => "company_type",
            Self::State => "state",
            Self::City => "city",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Validated answers the user has given so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<Step, String>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, step: Step) -> Option<&str> {
        self.0.get(&step).map(String::as_str)
    }

    pub fn contains(&self, step: Step) -> bool {
        self.0.contains_key(&step)
    }

    pub fn insert(&mut self, step: Step, answer: impl Into<String>) {
        self.0.insert(step, answer.into());
    }

    /// Answers in flow order.
    pub fn iter(&self) -> impl Iterator<Item = (Step, &str)> {
        self.0.iter().map(|(step, answer)| (*step, answer.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_flow_order_regardless_of_insertion() {
        let mut selections = Selections::new();
        selections.insert(Step::City, "Campinas");
        selections.insert(Step::MainMenu, "2");
        selections.insert(Step::State, "SP");

        let steps: Vec<_> = selections.iter().map(|(step, _)| step).collect();
        assert_eq!(steps, vec![Step::MainMenu, Step::State, Step::City]);
    }

    #[test]
    fn serializes_as_map_of_step_keys() {
        let mut selections = Selections::new();
        selections.insert(Step::MainMenu, "2");
        selections.insert(Step::CompanyType, "1");

        let json = serde_json::to_value(&selections).unwrap();
        assert_eq!(json, serde_json::json!({"main_menu": "2", "company_type": "1"}));
    }

    #[test]
    fn deserializes_from_stored_json() {
        let selections: Selections =
            serde_json::from_str(r#"{"state": "RJ", "city": "Niterói"}"#).unwrap();
        assert_eq!(selections.get(Step::State), Some("RJ"));
        assert_eq!(selections.get(Step::City), Some("Niterói"));
        assert!(!selections.contains(Step::MainMenu));
    }

    #[test]
    fn serde_name_matches_key() {
        for step in [Step::MainMenu, Step::CompanyType, Step::State, Step::City] {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{}\"", step.key()));
        }
    }
}
