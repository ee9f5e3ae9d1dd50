//! Core domain logic: session state machine and context accumulation

mod errors;
mod session;
mod types;

pub use errors::SessionError;
pub use session::SessionEngine;
pub use types::{
    Assessment, PitchAnalysis, QuestionAnswerPair, Session, SessionContext, SessionState,
    SessionSummary,
};
