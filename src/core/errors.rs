//! Domain error types
//!
//! These errors represent business logic failures, distinct from model or
//! network errors. Using thiserror for ergonomic error handling with proper
//! Display implementations.

use super::types::SessionState;
use thiserror::Error;

/// Errors raised by the session engine
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required field was empty or whitespace-only
    #[error("{field} cannot be empty")]
    Validation { field: &'static str },

    /// Operation invoked in a state that forbids it
    #[error("Cannot {operation} in state: {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Operation needs an active session but none exists
    #[error("No active session")]
    NoActiveSession,
}

impl SessionError {
    /// Whether the caller can recover by correcting input and retrying.
    ///
    /// Validation failures are caller-correctable; state-protocol
    /// violations require restarting the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Validation { .. })
    }

    /// Short actionable message suitable for direct display
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation { field } => {
                format!("Invalid input for {}. Please check your entry.", field)
            }
            SessionError::InvalidState { .. } | SessionError::NoActiveSession => {
                "Invalid session state. Please restart your interview session.".to_string()
            }
        }
    }

    /// Suggested next step for the user
    pub fn suggested_action(&self) -> &'static str {
        match self {
            SessionError::Validation { .. } => "Correct your input and try again",
            SessionError::InvalidState { .. } | SessionError::NoActiveSession => {
                "Restart your interview session"
            }
        }
    }
}
