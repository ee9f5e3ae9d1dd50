//! Session engine - interview session state machine and context accumulation
//!
//! Handles:
//! - Session creation and lifecycle (one live session per engine)
//! - The pitch -> question/answer -> end state protocol
//! - Append-only accumulation of question/answer exchanges
//! - Derived context for question generation (topic extraction)
//! - End-of-session summary aggregation

use super::errors::SessionError;
use super::types::{
    Assessment, QuestionAnswerPair, Session, SessionContext, SessionState, SessionSummary,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use uuid::Uuid;

/// Runs of non-word characters, used to tokenize questions and answers
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid regex"));

/// Owns the single active interview session and enforces its state machine
///
/// One engine instance serves one logical session at a time; callers that
/// need concurrent sessions hold one engine per session. All accessors hand
/// out snapshot copies, never references into the engine's internal state.
#[derive(Debug, Default)]
pub struct SessionEngine {
    session: Option<Session>,
    /// Summary derived at the first `end_session` call; repeat calls
    /// return a clone of this instead of re-deriving
    summary: Option<SessionSummary>,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session for the given category.
    ///
    /// Replaces any existing session irrecoverably. The new session starts
    /// in the introductory-pitch stage with no exchanges and no pitch.
    pub fn initialize_session(&mut self, category: &str) -> Result<Session, SessionError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(SessionError::Validation { field: "category" });
        }

        let session = Session {
            id: format!("session_{}", Uuid::new_v4()),
            category: category.to_string(),
            start_time: Utc::now(),
            introductory_pitch: None,
            exchanges: Vec::new(),
            current_state: SessionState::IntroductoryPitch,
        };

        tracing::info!(id = %session.id, category = %session.category, "session initialized");
        self.session = Some(session.clone());
        self.summary = None;
        Ok(session)
    }

    /// Store the introductory pitch and advance to the question stage.
    ///
    /// One-shot: succeeds only in the introductory-pitch stage, so a pitch
    /// can never be stored twice for the same session.
    pub fn store_pitch(&mut self, pitch: &str) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        if session.current_state != SessionState::IntroductoryPitch {
            return Err(SessionError::InvalidState {
                operation: "store pitch",
                state: session.current_state,
            });
        }

        let pitch = pitch.trim();
        if pitch.is_empty() {
            return Err(SessionError::Validation { field: "pitch" });
        }

        session.introductory_pitch = Some(pitch.to_string());
        session.current_state = SessionState::QuestionAnswer;
        tracing::debug!(id = %session.id, "pitch stored, session in question stage");
        Ok(())
    }

    /// Append a question/answer exchange with its assessment.
    ///
    /// The assessment is trusted as pre-validated by the parser. The
    /// session stays in the question stage, so any number of exchanges
    /// may follow.
    pub fn add_exchange(
        &mut self,
        question: &str,
        answer: &str,
        assessment: Assessment,
    ) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        if session.current_state != SessionState::QuestionAnswer {
            return Err(SessionError::InvalidState {
                operation: "add exchange",
                state: session.current_state,
            });
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::Validation { field: "question" });
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::Validation { field: "answer" });
        }

        session.exchanges.push(QuestionAnswerPair {
            question: question.to_string(),
            answer: answer.to_string(),
            assessment,
            timestamp: Utc::now(),
        });
        tracing::debug!(id = %session.id, count = session.exchanges.len(), "exchange recorded");
        Ok(())
    }

    /// Build a fresh context snapshot for generating the next question.
    pub fn context(&self) -> Result<SessionContext, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoActiveSession)?;

        Ok(SessionContext {
            category: session.category.clone(),
            introductory_pitch: session.introductory_pitch.clone(),
            previous_exchanges: session.exchanges.clone(),
            extracted_topics: extract_topics(&session.exchanges),
        })
    }

    /// Get a defensive copy of the current session, if any. Never fails.
    pub fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }

    /// End the session and derive its summary.
    ///
    /// Idempotent: the first call freezes the state at `SessionEnd` and
    /// derives the summary; later calls return the same summary without
    /// mutating anything further.
    pub fn end_session(&mut self) -> Result<SessionSummary, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        if let Some(summary) = &self.summary {
            return Ok(summary.clone());
        }

        session.current_state = SessionState::SessionEnd;

        let total_questions = session.exchanges.len();
        let average_score = if total_questions > 0 {
            session
                .exchanges
                .iter()
                .map(|ex| ex.assessment.score as f64)
                .sum::<f64>()
                / total_questions as f64
        } else {
            0.0
        };

        let summary = SessionSummary {
            session_id: session.id.clone(),
            category: session.category.clone(),
            total_questions,
            average_score,
            overall_strengths: dedup_union(
                session.exchanges.iter().flat_map(|ex| &ex.assessment.strengths),
            ),
            overall_improvements: dedup_union(
                session
                    .exchanges
                    .iter()
                    .flat_map(|ex| &ex.assessment.improvements),
            ),
            exchanges: session.exchanges.clone(),
            duration_ms: (Utc::now() - session.start_time).num_milliseconds(),
        };

        tracing::info!(
            id = %session.id,
            questions = total_questions,
            average = average_score,
            "session ended"
        );
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Query the fixed transition table without mutating anything.
    ///
    /// With no active session only the introductory-pitch stage is
    /// reachable (that is the transition out of category selection).
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        let current = match &self.session {
            Some(session) => session.current_state,
            None => SessionState::CategorySelection,
        };
        current.valid_targets().contains(&target)
    }

    /// Discard the active session unconditionally. Never fails.
    pub fn reset(&mut self) {
        self.session = None;
        self.summary = None;
    }
}

/// Lowercase word tokens longer than 3 characters from every question and
/// answer, deduplicated across all exchanges cumulatively.
///
/// Recomputed from scratch on every context call; exchange counts are
/// bounded by a single interview, so no incremental cache is kept.
fn extract_topics(exchanges: &[QuestionAnswerPair]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();

    for exchange in exchanges {
        for text in [&exchange.question, &exchange.answer] {
            for word in NON_WORD.split(&text.to_lowercase()) {
                if word.len() > 3 && seen.insert(word.to_string()) {
                    topics.push(word.to_string());
                }
            }
        }
    }

    topics
}

/// First-occurrence-order union with set semantics
fn dedup_union<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.as_str()) {
            out.push(item.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(score: u8) -> Assessment {
        Assessment {
            score,
            strengths: vec!["Clear communication".to_string()],
            improvements: vec!["More examples".to_string()],
            detailed_feedback: "Solid answer".to_string(),
        }
    }

    fn engine_in_question_stage() -> SessionEngine {
        let mut engine = SessionEngine::new();
        engine.initialize_session("Software Engineering").unwrap();
        engine.store_pitch("I build distributed systems in Rust").unwrap();
        engine
    }

    #[test]
    fn test_initialize_session() {
        let mut engine = SessionEngine::new();
        let session = engine.initialize_session("  Data Science  ").unwrap();

        assert_eq!(session.category, "Data Science");
        assert_eq!(session.current_state, SessionState::IntroductoryPitch);
        assert!(session.exchanges.is_empty());
        assert!(session.introductory_pitch.is_none());
        assert!(session.id.starts_with("session_"));
    }

    #[test]
    fn test_initialize_rejects_empty_category() {
        let mut engine = SessionEngine::new();
        assert!(matches!(
            engine.initialize_session(""),
            Err(SessionError::Validation { field: "category" })
        ));
        assert!(matches!(
            engine.initialize_session("   "),
            Err(SessionError::Validation { field: "category" })
        ));
    }

    #[test]
    fn test_initialize_replaces_existing_session() {
        let mut engine = SessionEngine::new();
        let first = engine.initialize_session("Sales").unwrap();
        let second = engine.initialize_session("Finance").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(engine.current_session().unwrap().category, "Finance");
    }

    #[test]
    fn test_store_pitch_transitions_state() {
        let mut engine = SessionEngine::new();
        engine.initialize_session("Consulting").unwrap();
        engine.store_pitch("  Ten years in strategy consulting  ").unwrap();

        let session = engine.current_session().unwrap();
        assert_eq!(
            session.introductory_pitch.as_deref(),
            Some("Ten years in strategy consulting")
        );
        assert_eq!(session.current_state, SessionState::QuestionAnswer);
    }

    #[test]
    fn test_store_pitch_without_session_fails() {
        let mut engine = SessionEngine::new();
        assert!(matches!(
            engine.store_pitch("hello"),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn test_store_pitch_twice_fails() {
        let mut engine = engine_in_question_stage();
        let err = engine.store_pitch("again").unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                state: SessionState::QuestionAnswer,
                ..
            }
        ));
    }

    #[test]
    fn test_store_empty_pitch_fails() {
        let mut engine = SessionEngine::new();
        engine.initialize_session("Marketing").unwrap();
        assert!(matches!(
            engine.store_pitch("   "),
            Err(SessionError::Validation { field: "pitch" })
        ));
    }

    #[test]
    fn test_add_exchange_accumulates() {
        let mut engine = engine_in_question_stage();
        engine
            .add_exchange("  What is ownership?  ", "  Move semantics  ", assessment(7))
            .unwrap();
        engine
            .add_exchange("What are lifetimes?", "Borrow scopes", assessment(8))
            .unwrap();

        let session = engine.current_session().unwrap();
        assert_eq!(session.exchanges.len(), 2);
        assert_eq!(session.exchanges[0].question, "What is ownership?");
        assert_eq!(session.exchanges[0].answer, "Move semantics");
        assert!(session.exchanges[0].timestamp <= session.exchanges[1].timestamp);
        // State stays in the question stage for further exchanges
        assert_eq!(session.current_state, SessionState::QuestionAnswer);
    }

    #[test]
    fn test_add_exchange_in_pitch_stage_fails() {
        let mut engine = SessionEngine::new();
        engine.initialize_session("Design").unwrap();

        let err = engine
            .add_exchange("question", "answer", assessment(5))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                state: SessionState::IntroductoryPitch,
                ..
            }
        ));
        assert!(err.to_string().contains("introductory_pitch"));
    }

    #[test]
    fn test_add_exchange_validates_inputs() {
        let mut engine = engine_in_question_stage();
        assert!(matches!(
            engine.add_exchange("  ", "answer", assessment(5)),
            Err(SessionError::Validation { field: "question" })
        ));
        assert!(matches!(
            engine.add_exchange("question", "", assessment(5)),
            Err(SessionError::Validation { field: "answer" })
        ));
    }

    #[test]
    fn test_context_snapshot() {
        let mut engine = engine_in_question_stage();
        engine
            .add_exchange("Tell me about concurrency", "Channels and tasks", assessment(6))
            .unwrap();

        let context = engine.context().unwrap();
        assert_eq!(context.category, "Software Engineering");
        assert_eq!(
            context.introductory_pitch.as_deref(),
            Some("I build distributed systems in Rust")
        );
        assert_eq!(context.previous_exchanges.len(), 1);
        assert!(!context.extracted_topics.is_empty());
    }

    #[test]
    fn test_context_without_session_fails() {
        let engine = SessionEngine::new();
        assert!(matches!(
            engine.context(),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn test_topic_extraction() {
        let mut engine = engine_in_question_stage();
        engine
            .add_exchange(
                "Describe your testing strategy",
                "Unit tests and integration testing",
                assessment(7),
            )
            .unwrap();

        let topics = engine.context().unwrap().extracted_topics;
        // Lowercased, length > 3, deduplicated across question and answer
        assert!(topics.contains(&"describe".to_string()));
        assert!(topics.contains(&"testing".to_string()));
        assert!(topics.contains(&"integration".to_string()));
        assert!(!topics.contains(&"and".to_string()));
        assert_eq!(
            topics.iter().filter(|t| *t == "testing").count(),
            1,
            "tokens must be deduplicated"
        );
    }

    #[test]
    fn test_topics_accumulate_across_exchanges() {
        let mut engine = engine_in_question_stage();
        engine
            .add_exchange("First question here", "Answer about databases", assessment(5))
            .unwrap();
        engine
            .add_exchange("Second question here", "Answer about caching", assessment(5))
            .unwrap();

        let topics = engine.context().unwrap().extracted_topics;
        assert!(topics.contains(&"databases".to_string()));
        assert!(topics.contains(&"caching".to_string()));
    }

    #[test]
    fn test_end_session_summary() {
        let mut engine = engine_in_question_stage();
        let mut a = assessment(6);
        a.strengths = vec!["Depth".to_string(), "Clarity".to_string()];
        a.improvements = vec!["Pacing".to_string()];
        engine.add_exchange("Q1", "A1", a).unwrap();

        let mut b = assessment(9);
        b.strengths = vec!["Clarity".to_string()];
        b.improvements = vec!["Pacing".to_string(), "Structure".to_string()];
        engine.add_exchange("Q2", "A2", b).unwrap();

        let summary = engine.end_session().unwrap();
        assert_eq!(summary.total_questions, 2);
        assert!((summary.average_score - 7.5).abs() < f64::EPSILON);
        assert_eq!(summary.overall_strengths, vec!["Depth", "Clarity"]);
        assert_eq!(summary.overall_improvements, vec!["Pacing", "Structure"]);
        assert_eq!(summary.exchanges.len(), 2);
        assert!(summary.duration_ms >= 0);
        assert_eq!(
            engine.current_session().unwrap().current_state,
            SessionState::SessionEnd
        );
    }

    #[test]
    fn test_end_session_empty() {
        let mut engine = engine_in_question_stage();
        let summary = engine.end_session().unwrap();
        assert_eq!(summary.total_questions, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.overall_strengths.is_empty());
    }

    #[test]
    fn test_end_session_is_idempotent() {
        let mut engine = engine_in_question_stage();
        engine.add_exchange("Q", "A", assessment(8)).unwrap();

        let first = engine.end_session().unwrap();
        let second = engine.end_session().unwrap();
        assert_eq!(first.duration_ms, second.duration_ms);
        assert_eq!(first.total_questions, second.total_questions);
    }

    #[test]
    fn test_no_mutation_after_end() {
        let mut engine = engine_in_question_stage();
        engine.end_session().unwrap();

        assert!(matches!(
            engine.add_exchange("Q", "A", assessment(5)),
            Err(SessionError::InvalidState {
                state: SessionState::SessionEnd,
                ..
            })
        ));
    }

    #[test]
    fn test_end_session_without_session_fails() {
        let mut engine = SessionEngine::new();
        assert!(matches!(
            engine.end_session(),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn test_can_transition_to() {
        let mut engine = SessionEngine::new();
        // No session: only the pitch stage is reachable
        assert!(engine.can_transition_to(SessionState::IntroductoryPitch));
        assert!(!engine.can_transition_to(SessionState::QuestionAnswer));
        assert!(!engine.can_transition_to(SessionState::SessionEnd));
        assert!(!engine.can_transition_to(SessionState::CategorySelection));

        engine.initialize_session("Finance").unwrap();
        assert!(engine.can_transition_to(SessionState::QuestionAnswer));
        assert!(!engine.can_transition_to(SessionState::SessionEnd));

        engine.store_pitch("CPA with audit experience").unwrap();
        assert!(engine.can_transition_to(SessionState::SessionEnd));
        assert!(!engine.can_transition_to(SessionState::IntroductoryPitch));

        engine.end_session().unwrap();
        // Terminal: nothing reachable out of session_end
        assert!(!engine.can_transition_to(SessionState::IntroductoryPitch));
        assert!(!engine.can_transition_to(SessionState::QuestionAnswer));
        assert!(!engine.can_transition_to(SessionState::SessionEnd));
    }

    #[test]
    fn test_reset() {
        let mut engine = engine_in_question_stage();
        engine.reset();
        assert!(engine.current_session().is_none());
        assert!(engine.can_transition_to(SessionState::IntroductoryPitch));
    }

    #[test]
    fn test_current_session_is_defensive_copy() {
        let mut engine = engine_in_question_stage();
        let mut copy = engine.current_session().unwrap();
        copy.category = "tampered".to_string();
        copy.exchanges.push(QuestionAnswerPair {
            question: "x".to_string(),
            answer: "y".to_string(),
            assessment: assessment(1),
            timestamp: Utc::now(),
        });

        let fresh = engine.current_session().unwrap();
        assert_eq!(fresh.category, "Software Engineering");
        assert!(fresh.exchanges.is_empty());
    }
}
