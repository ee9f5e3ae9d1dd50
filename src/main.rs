use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intervu::catalog;
use intervu::core::{SessionEngine, SessionState};
use intervu::llm::{ModelClient, ModelError, OllamaGenerator};
use intervu::Config;

/// Fallback used when question generation fails; the session keeps going
/// rather than dying on a transient model error.
const FALLBACK_QUESTION: &str = "What are your key strengths for this role?";

#[derive(Parser)]
#[command(name = "intervu")]
#[command(author, version, about = "Intervu - AI-powered interview practice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available interview categories
    Categories,

    /// Run a practice interview session
    Practice {
        /// Category id (see `intervu categories`)
        #[arg(short, long)]
        category: String,

        /// Number of questions to ask
        #[arg(short, long)]
        questions: Option<usize>,

        /// Ollama base URL (default from config)
        #[arg(long)]
        base_url: Option<String>,

        /// Model to use (e.g. llama3.2, qwen2.5:3b)
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "intervu=debug" } else { "intervu=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Categories => {
            for category in catalog::all() {
                println!("{:<20} {} - {}", category.id, category.name, category.description);
            }
            Ok(())
        }
        Commands::Practice {
            category,
            questions,
            base_url,
            model,
        } => practice(&category, questions, base_url, model).await,
    }
}

async fn practice(
    category_id: &str,
    questions: Option<usize>,
    base_url: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let config = Config::load().unwrap_or_default();

    let category = catalog::find(category_id).ok_or_else(|| {
        anyhow::anyhow!("Unknown category: {}. See `intervu categories`.", category_id)
    })?;
    let question_count = questions.unwrap_or(config.session.questions_per_session);

    let generator = OllamaGenerator::new()
        .with_base_url(base_url.as_deref().unwrap_or(&config.model.base_url))
        .with_model(model.as_deref().unwrap_or(&config.model.model));
    let client = ModelClient::new(generator)
        .with_max_retries(config.model.max_retries)
        .with_base_delay(Duration::from_millis(config.model.retry_delay_ms));

    // Ctrl+C cancels the in-flight generation and ends the session early
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let mut engine = SessionEngine::new();
    engine.initialize_session(category.name)?;

    println!("Practice interview: {}", category.name);
    println!("{}", category.context);
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let pitch = prompt_line(&mut lines, "Introduce yourself: ").await?;
    engine.store_pitch(&pitch)?;

    match client.analyze_introduction(&pitch, Some(&cancel)).await {
        Ok(analysis) => {
            if !analysis.key_topics.is_empty() {
                println!("Noted topics: {}", analysis.key_topics.join(", "));
            }
        }
        Err(ModelError::Cancelled) => return finish(&mut engine),
        Err(err) => {
            // No safe default exists for the analysis; tell the user and move on
            eprintln!("{}", err.user_message());
            tracing::warn!(error = %err, "pitch analysis failed");
        }
    }

    for number in 1..=question_count {
        if !engine.can_transition_to(SessionState::SessionEnd) {
            break;
        }

        let context = engine.context()?;
        let question = match client
            .generate_question(&context, &context.category, Some(&cancel))
            .await
        {
            Ok(question) => question,
            Err(ModelError::Cancelled) => return finish(&mut engine),
            Err(err) => {
                tracing::warn!(error = %err, "question generation failed, using fallback");
                FALLBACK_QUESTION.to_string()
            }
        };

        println!();
        println!("Question {number}: {question}");
        let answer = prompt_line(&mut lines, "> ").await?;

        let assessment = match client
            .assess_response(&question, &answer, &context.category, Some(&cancel))
            .await
        {
            Ok(assessment) => assessment,
            Err(ModelError::Cancelled) => return finish(&mut engine),
            Err(err) => {
                eprintln!("{}", err.user_message());
                tracing::warn!(error = %err, "assessment failed, skipping exchange");
                continue;
            }
        };

        println!("Score: {}/10", assessment.score);
        println!("Strengths: {}", assessment.strengths.join("; "));
        println!("Improvements: {}", assessment.improvements.join("; "));
        println!("{}", assessment.detailed_feedback);

        engine.add_exchange(&question, &answer, assessment)?;
    }

    finish(&mut engine)
}

fn finish(engine: &mut SessionEngine) -> Result<()> {
    let summary = engine.end_session()?;

    println!();
    println!("Session complete: {}", summary.category);
    println!("Questions answered: {}", summary.total_questions);
    println!("Average score: {:.1}/10", summary.average_score);
    if !summary.overall_strengths.is_empty() {
        println!("Overall strengths: {}", summary.overall_strengths.join("; "));
    }
    if !summary.overall_improvements.is_empty() {
        println!(
            "Overall improvements: {}",
            summary.overall_improvements.join("; ")
        );
    }
    println!(
        "Duration: {:.1} minutes",
        summary.duration_ms as f64 / 60_000.0
    );
    Ok(())
}

async fn prompt_line(
    lines: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    prompt: &str,
) -> Result<String> {
    loop {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        match lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
            Some(_) => continue,
            None => anyhow::bail!("stdin closed"),
        }
    }
}
