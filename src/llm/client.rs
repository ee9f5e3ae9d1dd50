//! Model client - init-once wrapper around a text generator
//!
//! Handles:
//! - Lazy one-time initialization of the underlying generator, with
//!   concurrent callers awaiting the same initialization
//! - Retry with linear backoff around each generation call
//! - Wrapping terminal failures in fixed per-operation errors
//! - Cooperative cancellation of in-flight calls

use super::error::{ModelError, ModelOp};
use super::{parser, prompts, GeneratedText, GenerationOptions, TextGenerator};
use crate::core::{Assessment, PitchAnalysis, SessionContext};
use anyhow::anyhow;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

const QUESTION_OPTIONS: GenerationOptions = GenerationOptions {
    max_new_tokens: 100,
    temperature: 0.7,
};
const ASSESSMENT_OPTIONS: GenerationOptions = GenerationOptions {
    max_new_tokens: 250,
    temperature: 0.5,
};
const PITCH_OPTIONS: GenerationOptions = GenerationOptions {
    max_new_tokens: 200,
    temperature: 0.3,
};

/// Wraps one opaque text generator with initialization and retry policy.
///
/// Initialization runs at most once: callers racing before it completes
/// all await the same attempt (the init lock is held for its duration),
/// and a failed attempt leaves the client uninitialized so a later call
/// retries it.
pub struct ModelClient<G> {
    generator: G,
    initialized: Mutex<bool>,
    max_retries: u32,
    base_delay: Duration,
}

impl<G: TextGenerator> ModelClient<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            initialized: Mutex::new(false),
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Access the wrapped generator (e.g. for inspecting a test double).
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate the next interview question from accumulated context.
    pub async fn generate_question(
        &self,
        context: &SessionContext,
        category: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, ModelError> {
        let prompt = prompts::question_prompt(context, category);
        let raw = self
            .run(ModelOp::GenerateQuestion, &prompt, QUESTION_OPTIONS, cancel)
            .await?;
        Ok(parser::parse_question(&raw))
    }

    /// Assess one answer, returning a structurally valid assessment.
    pub async fn assess_response(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<Assessment, ModelError> {
        let prompt = prompts::assessment_prompt(question, answer, category);
        let raw = self
            .run(ModelOp::AssessResponse, &prompt, ASSESSMENT_OPTIONS, cancel)
            .await?;
        Ok(parser::parse_assessment(&raw))
    }

    /// Extract structured information from the self-introduction.
    pub async fn analyze_introduction(
        &self,
        pitch: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<PitchAnalysis, ModelError> {
        let prompt = prompts::pitch_analysis_prompt(pitch);
        let raw = self
            .run(ModelOp::AnalyzeIntroduction, &prompt, PITCH_OPTIONS, cancel)
            .await?;
        Ok(parser::parse_pitch_analysis(&raw))
    }

    /// One full operation: init if needed, generate with retries, take the
    /// first candidate. Cancellation covers the whole call including
    /// backoff sleeps and leaves no state behind.
    async fn run(
        &self,
        op: ModelOp,
        prompt: &str,
        options: GenerationOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, ModelError> {
        let call = self.run_inner(op, prompt, options);
        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(ModelError::Cancelled),
                result = call => result,
            },
            None => call.await,
        }
    }

    async fn run_inner(
        &self,
        op: ModelOp,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, ModelError> {
        self.ensure_ready().await.map_err(|err| ModelError::Generation {
            op,
            source: anyhow::Error::new(err),
        })?;

        let candidates = self.generate_with_retry(op, prompt, &options).await?;
        first_text(candidates).map_err(|source| ModelError::Generation { op, source })
    }

    /// Initialize the generator exactly once. Holding the lock for the
    /// duration makes concurrent callers await the same attempt instead
    /// of starting duplicates.
    async fn ensure_ready(&self) -> Result<(), ModelError> {
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            return Ok(());
        }

        tracing::debug!("initializing text generator");
        self.generator.init().await.map_err(|err| {
            tracing::error!(error = %err, "generator initialization failed");
            ModelError::Init(err)
        })?;

        *initialized = true;
        Ok(())
    }

    /// Linear backoff: the n-th retry waits `base_delay * n`.
    async fn generate_with_retry(
        &self,
        op: ModelOp,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Vec<GeneratedText>, ModelError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.generator.generate(prompt, options).await {
                Ok(candidates) => return Ok(candidates),
                Err(err) if attempt <= self.max_retries => {
                    let delay = self.base_delay * attempt;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "generation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(attempts = attempt, error = %err, "generation failed terminally");
                    return Err(ModelError::Generation { op, source: err });
                }
            }
        }
    }
}

/// A generator may return one candidate or several; the first candidate's
/// text wins. No candidates at all is a terminal failure, not retried.
fn first_text(candidates: Vec<GeneratedText>) -> anyhow::Result<String> {
    candidates
        .into_iter()
        .next()
        .map(|candidate| candidate.text)
        .ok_or_else(|| anyhow!("model returned no candidates"))
}
