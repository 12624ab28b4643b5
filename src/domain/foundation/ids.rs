//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;
use crate::domain::validation::{digits_only, validate_identity};

/// Unique identifier for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Creates a new random ConversationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConversationId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the human consultant a conversation is handed to.
///
/// Issued by the back-office, so it is an opaque non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultantId(String);

impl ConsultantId {
    /// Creates a new ConsultantId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("consultant_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsultantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's phone number, the key conversations are looked up by.
///
/// Stored as digits only, so `+55 (11) 99999-9999` and `5511999999999`
/// address the same user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parses a phone-number-like string.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("identity"));
        }
        if !validate_identity(raw) {
            return Err(ValidationError::invalid_format(
                "identity",
                "expected 10 or 11 digits, or 12/13 digits with country code 55",
            ));
        }
        Ok(Self(digits_only(raw)))
    }

    /// Rebuilds an identity already validated before it was persisted.
    pub fn from_trusted(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl FromStr for Identity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod conversation_id {
        use super::*;

        #[test]
        fn new_generates_unique_ids() {
            assert_ne!(ConversationId::new(), ConversationId::new());
        }

        #[test]
        fn parses_from_display_output() {
            let id = ConversationId::new();
            let parsed: ConversationId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }

        #[test]
        fn rejects_non_uuid_strings() {
            assert!("not-a-uuid".parse::<ConversationId>().is_err());
        }
    }

    mod consultant_id {
        use super::*;

        #[test]
        fn trims_surrounding_whitespace() {
            let id = ConsultantId::new("  ana.souza ").unwrap();
            assert_eq!(id.as_str(), "ana.souza");
        }

        #[test]
        fn rejects_blank_string() {
            match ConsultantId::new("   ") {
                Err(ValidationError::EmptyField { field }) => assert_eq!(field, "consultant_id"),
                other => panic!("expected EmptyField, got {:?}", other),
            }
        }
    }

    mod identity {
        use super::*;

        #[test]
        fn strips_plus_and_formatting() {
            let id = Identity::parse("+55 (11) 99999-9999").unwrap();
            assert_eq!(id.as_str(), "5511999999999");
        }

        #[test]
        fn equal_numbers_in_different_formats_are_equal() {
            assert_eq!(
                Identity::parse("+5511999999999").unwrap(),
                Identity::parse("5511999999999").unwrap()
            );
        }

        #[test]
        fn rejects_empty_input_as_empty_field() {
            assert!(matches!(
                Identity::parse("  "),
                Err(ValidationError::EmptyField { .. })
            ));
        }

        #[test]
        fn rejects_wrong_digit_count() {
            assert!(matches!(
                Identity::parse("123"),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }

        #[test]
        fn deserializing_validates_and_normalizes() {
            let id: Identity = serde_json::from_str("\"+55 11 99999-9999\"").unwrap();
            assert_eq!(id.as_str(), "5511999999999");
            assert_eq!(serde_json::to_string(&id).unwrap(), "\"5511999999999\"");

            assert!(serde_json::from_str::<Identity>("\"123\"").is_err());
            assert!(serde_json::from_str::<Identity>("\"\"").is_err());
        }
    }
}
