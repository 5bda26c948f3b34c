//! Core types for calbot.
//!
//! This crate provides the pieces shared by the chatbot binary and the Google
//! provider:
//! - `CalendarEvent` / `NewEvent` and related event types
//! - the `CalendarGateway` trait the provider implements
//! - `AppConfig`, error types and date windows

pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod gateway;

pub use config::AppConfig;
pub use error::{CalbotError, CalbotResult, RemoteError};
pub use event::{CalendarEvent, EventTime, NewEvent};
pub use gateway::CalendarGateway;
