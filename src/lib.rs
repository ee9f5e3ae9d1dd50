//! intervu: AI-powered interview practice
//!
//! This library provides:
//! - A session state machine with monotonic context accumulation
//! - Best-effort parsing of generated text into structured assessments
//! - Prompt assembly for question generation, assessment, and pitch analysis
//! - A model client with init-once semantics, linear-backoff retries, and
//!   cooperative cancellation
//! - A static catalog of interview categories

pub mod catalog;
pub mod config;
pub mod core;
pub mod llm;

pub use config::Config;
pub use core::{SessionEngine, SessionError};
pub use llm::{ModelClient, ModelError, OllamaGenerator, TextGenerator};
