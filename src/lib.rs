//! Intake Bot - Guided WhatsApp intake for a medical accounting practice
//!
//! This crate implements a menu-driven dialogue engine that walks a user
//! through a fixed sequence of questions over chat and hands the
//! conversation to a human consultant.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
