//! Error types for calbot.

use thiserror::Error;

/// Errors that can occur in calbot operations.
#[derive(Error, Debug)]
pub enum CalbotError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A failure reported by the remote calendar service or the transport to it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.describe())]
pub struct RemoteError {
    /// HTTP status, when the failure carried one
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        RemoteError {
            status,
            message: message.into(),
        }
    }

    /// Build a RemoteError from an error message, picking up an HTTP status
    /// code if the message mentions one.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let status = status_in_message(&message);
        RemoteError { status, message }
    }

    /// True when the service says the resource is already gone.
    pub fn is_gone(&self) -> bool {
        matches!(self.status, Some(404 | 410))
    }

    fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("Remote error (HTTP {}): {}", status, self.message),
            None => format!("Remote error: {}", self.message),
        }
    }
}

/// Find the first standalone 4xx/5xx number in an error message.
fn status_in_message(message: &str) -> Option<u16> {
    message
        .split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 3)
        .filter_map(|token| token.parse::<u16>().ok())
        .find(|code| (400..600).contains(code))
}

/// Result type alias for calbot operations.
pub type CalbotResult<T> = Result<T, CalbotError>;
