//! Text-generation capability and the interview model client

mod client;
mod error;
mod ollama;
mod parser;
mod prompts;

pub use client::ModelClient;
pub use error::{ModelError, ModelOp};
pub use ollama::OllamaGenerator;
pub use parser::{parse_assessment, parse_pitch_analysis, parse_question};
pub use prompts::{assessment_prompt, pitch_analysis_prompt, question_prompt};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling options for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub max_new_tokens: u32,
    pub temperature: f32,
}

/// One generated candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
}

/// An opaque asynchronous text-generation capability.
///
/// Implementations may return one candidate or several; callers take the
/// first candidate's text. `init` is invoked once by the model client
/// before the first generation and may be called again after a failure.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Prepare the underlying model. Default is a no-op for generators
    /// that need no warm-up.
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Map a prompt to generated text.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<Vec<GeneratedText>>;
}
