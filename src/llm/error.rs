//! Typed errors for model operations
//!
//! Keeps the fixed per-operation messages stable for callers while carrying
//! the causing error for diagnostics.

use thiserror::Error;

/// The three public model operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOp {
    GenerateQuestion,
    AssessResponse,
    AnalyzeIntroduction,
}

impl ModelOp {
    /// Fixed descriptive message for a terminal failure of this operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::GenerateQuestion => "Failed to generate question",
            Self::AssessResponse => "Failed to assess response",
            Self::AnalyzeIntroduction => "Failed to analyze introduction",
        }
    }
}

/// Errors surfaced by the model client
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model initialization failed; the client stays uninitialized so a
    /// later call may retry
    #[error("Failed to initialize local model")]
    Init(#[source] anyhow::Error),

    /// A generation operation failed after exhausting retries
    #[error("{}", op.failure_message())]
    Generation {
        op: ModelOp,
        #[source]
        source: anyhow::Error,
    },

    /// The caller cancelled the in-flight call
    #[error("Generation cancelled")]
    Cancelled,
}

impl ModelError {
    /// Generic message for display; internal error text is never leaked.
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelError::Cancelled => "Generation was cancelled.",
            _ => "We encountered an issue with the AI service. Please try again.",
        }
    }

    /// Whether the user can simply retry the operation
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
