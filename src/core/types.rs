//! Canonical type definitions for the interview domain
//!
//! This module is the single source of truth for types shared between the
//! session engine, the model client, and the CLI, to prevent type drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stage of an interview session
///
/// Sessions advance monotonically: once a stage is left it is never
/// re-entered, and `SessionEnd` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Choosing a category; no session object exists yet at this stage
    CategorySelection,
    /// Waiting for the candidate's self-introduction
    IntroductoryPitch,
    /// Follow-up questions and answers
    QuestionAnswer,
    /// Session has ended; no further mutation allowed
    SessionEnd,
}

impl SessionState {
    /// States reachable from this one (fixed transition table)
    pub fn valid_targets(&self) -> &'static [SessionState] {
        match self {
            Self::CategorySelection => &[Self::IntroductoryPitch],
            Self::IntroductoryPitch => &[Self::QuestionAnswer],
            Self::QuestionAnswer => &[Self::SessionEnd],
            Self::SessionEnd => &[],
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategorySelection => write!(f, "category_selection"),
            Self::IntroductoryPitch => write!(f, "introductory_pitch"),
            Self::QuestionAnswer => write!(f, "question_answer"),
            Self::SessionEnd => write!(f, "session_end"),
        }
    }
}

/// Structured evaluation of one answer, produced by the response parser
///
/// `strengths`, `improvements`, and `detailed_feedback` are never empty:
/// the parser substitutes deterministic defaults when extraction yields
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Score in 0..=10, clamped at parse time
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
}

/// One completed question-answer exchange with its assessment
///
/// Created once, never mutated. The assessment is attached atomically
/// with the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswerPair {
    pub question: String,
    pub answer: String,
    pub assessment: Assessment,
    pub timestamp: DateTime<Utc>,
}

/// The single mutable aggregate for one interview attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub category: String,
    pub start_time: DateTime<Utc>,
    /// Absent until the pitch stage completes; set at most once
    pub introductory_pitch: Option<String>,
    /// Append-only; insertion order is chronological order
    pub exchanges: Vec<QuestionAnswerPair>,
    pub current_state: SessionState,
}

/// Read-only projection of session history used for question generation
///
/// Built fresh on every request; holds snapshot copies, never live
/// references into the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub category: String,
    pub introductory_pitch: Option<String>,
    pub previous_exchanges: Vec<QuestionAnswerPair>,
    /// Lowercase word tokens (length > 3) from all questions and answers
    /// seen so far, deduplicated
    pub extracted_topics: Vec<String>,
}

/// Structured extraction from the self-introduction
///
/// Unlike [`Assessment`], every list here may legitimately be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchAnalysis {
    pub key_topics: Vec<String>,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
}

/// Terminal aggregate derived when a session ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub category: String,
    pub total_questions: usize,
    /// Arithmetic mean of assessment scores; 0.0 for an empty session
    pub average_score: f64,
    /// Deduplicated union across all exchanges
    pub overall_strengths: Vec<String>,
    pub overall_improvements: Vec<String>,
    pub exchanges: Vec<QuestionAnswerPair>,
    /// Milliseconds between session start and the end-session call
    pub duration_ms: i64,
}
