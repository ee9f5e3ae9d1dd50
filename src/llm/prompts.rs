//! Prompt assembly for the three model calls
//!
//! Pure append-only string builders. The output-format templates here are
//! requests, not guarantees; the response parser tolerates the model
//! ignoring them entirely.

use crate::core::SessionContext;
use std::fmt::Write;

/// Prompt for generating the next interview question from accumulated
/// session context.
pub fn question_prompt(context: &SessionContext, category: &str) -> String {
    let mut prompt = format!("Generate an interview question for a {} position. ", category);

    if let Some(pitch) = &context.introductory_pitch {
        let _ = write!(prompt, "The candidate introduced themselves as: \"{}\". ", pitch);
    }

    if !context.previous_exchanges.is_empty() {
        prompt.push_str("Previous questions and answers: ");
        for (i, exchange) in context.previous_exchanges.iter().enumerate() {
            let _ = write!(
                prompt,
                "Q{}: {} A{}: {}. ",
                i + 1,
                exchange.question,
                i + 1,
                exchange.answer
            );
        }
    }

    if !context.extracted_topics.is_empty() {
        let _ = write!(
            prompt,
            "Focus on topics: {}. ",
            context.extracted_topics.join(", ")
        );
    }

    prompt.push_str("Generate a relevant follow-up question:");
    prompt
}

/// Prompt for assessing one answer, with the fixed four-label output
/// template the parser looks for.
pub fn assessment_prompt(question: &str, answer: &str, category: &str) -> String {
    format!(
        "Assess this interview answer for a {category} position.\n\
         Question: {question}\n\
         Answer: {answer}\n\
         \n\
         Provide assessment in this format:\n\
         Score: [0-10]\n\
         Strengths: [list strengths]\n\
         Improvements: [list improvements]\n\
         Feedback: [detailed feedback]"
    )
}

/// Prompt for extracting structured information from the self-introduction.
pub fn pitch_analysis_prompt(pitch: &str) -> String {
    format!(
        "Analyze this introduction pitch and extract key information:\n\
         \"{pitch}\"\n\
         \n\
         Extract:\n\
         Topics: [key topics mentioned]\n\
         Experience: [work experience mentioned]\n\
         Skills: [skills mentioned]\n\
         Interests: [interests mentioned]"
    )
}
