//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine trait)
//! - `validation` - Pure input validators for each dialogue step
//! - `conversation` - Conversation aggregate and message records
//! - `dialogue` - The intake flow as a pure transition function

pub mod conversation;
pub mod dialogue;
pub mod foundation;
pub mod validation;
