//! Best-effort parsing of generated text into structured records
//!
//! Output from a small local model is unreliable in structure; these
//! functions degrade gracefully instead of failing so the interview flow
//! always proceeds. They scan for a loose line-oriented `Label: value`
//! convention and substitute deterministic defaults for anything missing.
//! None of them ever returns an error.

use crate::core::{Assessment, PitchAnalysis};
use once_cell::sync::Lazy;
use regex::Regex;

/// First run of digits anywhere in a score line. A leading minus sign is
/// not captured, so "Score: -3" parses as 3; this mirrors the observable
/// behavior the assessment contract specifies.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

const DEFAULT_QUESTION: &str = "What are your key strengths for this role?";
const DEFAULT_STRENGTH: &str = "Response provided relevant information";
const DEFAULT_IMPROVEMENT: &str = "Consider providing more specific examples";
const DEFAULT_FEEDBACK: &str =
    "Your answer addresses the question. Consider elaborating with specific examples.";

/// Extract the question from raw generated text.
///
/// Takes the first newline-delimited segment, trimmed; substitutes a fixed
/// default question when the result is empty.
pub fn parse_question(raw: &str) -> String {
    let question = raw.trim().lines().next().unwrap_or("").trim();
    if question.is_empty() {
        DEFAULT_QUESTION.to_string()
    } else {
        question.to_string()
    }
}

/// Parse an assessment from raw generated text.
///
/// Two-tier fallback: the line scan fills per-field defaults for anything
/// it could not extract; if the scan itself fails, a wholly fixed minimal
/// assessment is returned instead of the partial result.
pub fn parse_assessment(raw: &str) -> Assessment {
    scan_assessment(raw).unwrap_or_else(fallback_assessment)
}

/// Line scan for the four assessment labels.
///
/// Per line, the first matching keyword wins: score, then strength, then
/// improvement, then feedback. Strengths and improvements accumulate one
/// entry per matching line (the whole after-colon remainder, not split on
/// commas); feedback is last-line-wins.
fn scan_assessment(raw: &str) -> Option<Assessment> {
    let mut score: u8 = 5;
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut detailed_feedback = String::new();

    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        let lower = line.to_lowercase();
        if lower.contains("score:") {
            if let Some(run) = DIGIT_RUN.find(line) {
                // Clamp to 0..=10; a digit run too long for u64 is
                // certainly above the scale
                score = run.as_str().parse::<u64>().map_or(10, |n| n.min(10)) as u8;
            }
        } else if lower.contains("strength") {
            if let Some(content) = after_colon(line) {
                strengths.push(content);
            }
        } else if lower.contains("improvement") {
            if let Some(content) = after_colon(line) {
                improvements.push(content);
            }
        } else if lower.contains("feedback:") {
            detailed_feedback = after_colon(line).unwrap_or_default();
        }
    }

    if strengths.is_empty() {
        strengths.push(DEFAULT_STRENGTH.to_string());
    }
    if improvements.is_empty() {
        improvements.push(DEFAULT_IMPROVEMENT.to_string());
    }
    if detailed_feedback.is_empty() {
        detailed_feedback = DEFAULT_FEEDBACK.to_string();
    }

    Some(Assessment {
        score,
        strengths,
        improvements,
        detailed_feedback,
    })
}

/// Fixed minimal assessment substituted when the scan fails outright,
/// distinct from the per-field defaults above.
fn fallback_assessment() -> Assessment {
    Assessment {
        score: 5,
        strengths: vec!["Response provided".to_string()],
        improvements: vec!["Consider providing more detail".to_string()],
        detailed_feedback: "Unable to fully assess response. Please try again.".to_string(),
    }
}

/// Parse a pitch analysis from raw generated text.
///
/// Scans for the topic/experience/skill/interest labels; the after-colon
/// content split on commas becomes the list, last matching line wins per
/// field. Absent sections remain empty; there is no non-empty invariant
/// here.
pub fn parse_pitch_analysis(raw: &str) -> PitchAnalysis {
    let mut analysis = PitchAnalysis::default();

    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        let lower = line.to_lowercase();
        if lower.contains("topic") {
            if let Some(content) = after_colon(line) {
                analysis.key_topics = split_commas(&content);
            }
        } else if lower.contains("experience") {
            if let Some(content) = after_colon(line) {
                analysis.experience = split_commas(&content);
            }
        } else if lower.contains("skill") {
            if let Some(content) = after_colon(line) {
                analysis.skills = split_commas(&content);
            }
        } else if lower.contains("interest") {
            if let Some(content) = after_colon(line) {
                analysis.interests = split_commas(&content);
            }
        }
    }

    analysis
}

/// Trimmed text after the first colon, or None when there is no colon or
/// nothing follows it
fn after_colon(line: &str) -> Option<String> {
    let content = line.splitn(2, ':').nth(1)?.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

fn split_commas(content: &str) -> Vec<String> {
    content.split(',').map(|part| part.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_first_line() {
        let raw = "Tell me about a project you led.\nSome trailing chatter.";
        assert_eq!(parse_question(raw), "Tell me about a project you led.");
    }

    #[test]
    fn test_parse_question_empty_falls_back() {
        assert_eq!(parse_question(""), DEFAULT_QUESTION);
        assert_eq!(parse_question("   \n\n"), DEFAULT_QUESTION);
    }

    #[test]
    fn test_assessment_round_trip() {
        let assessment =
            parse_assessment("Score: 7\nStrengths: A, B\nImprovements: C\nFeedback: D");
        assert_eq!(assessment.score, 7);
        // The whole remainder is one entry; no comma split here
        assert_eq!(assessment.strengths, vec!["A, B"]);
        assert_eq!(assessment.improvements, vec!["C"]);
        assert_eq!(assessment.detailed_feedback, "D");
    }

    #[test]
    fn test_assessment_score_only_gets_defaults() {
        let assessment = parse_assessment("Score: 5");
        assert_eq!(assessment.score, 5);
        assert_eq!(assessment.strengths, vec![DEFAULT_STRENGTH]);
        assert_eq!(assessment.improvements, vec![DEFAULT_IMPROVEMENT]);
        assert_eq!(assessment.detailed_feedback, DEFAULT_FEEDBACK);
    }

    #[test]
    fn test_assessment_score_clamped_high() {
        assert_eq!(parse_assessment("Score: 15").score, 10);
    }

    #[test]
    fn test_assessment_negative_score_digit_run() {
        // The digit-run extraction drops the minus sign: -3 reads as 3
        assert_eq!(parse_assessment("Score: -3").score, 3);
    }

    #[test]
    fn test_assessment_missing_score_defaults_to_five() {
        let assessment = parse_assessment("Strengths: solid fundamentals");
        assert_eq!(assessment.score, 5);
        assert_eq!(assessment.strengths, vec!["solid fundamentals"]);
    }

    #[test]
    fn test_assessment_multiple_strength_lines_accumulate() {
        let assessment = parse_assessment(
            "Strengths: clear structure\nKey strength: confident delivery\nImprovements: pacing",
        );
        assert_eq!(
            assessment.strengths,
            vec!["clear structure", "confident delivery"]
        );
        assert_eq!(assessment.improvements, vec!["pacing"]);
    }

    #[test]
    fn test_assessment_feedback_last_line_wins() {
        let assessment = parse_assessment("Feedback: first pass\nFeedback: final verdict");
        assert_eq!(assessment.detailed_feedback, "final verdict");
    }

    #[test]
    fn test_assessment_first_keyword_wins_per_line() {
        // "score:" matches before "feedback" on the same line
        let assessment = parse_assessment("Score: 8 feedback: ignored");
        assert_eq!(assessment.score, 8);
        assert_eq!(assessment.detailed_feedback, DEFAULT_FEEDBACK);
    }

    #[test]
    fn test_assessment_keyword_without_colon_content_skipped() {
        // Matches the strength keyword but has no colon, so nothing to take
        let assessment = parse_assessment("Your strengths were apparent");
        assert_eq!(assessment.strengths, vec![DEFAULT_STRENGTH]);
    }

    #[test]
    fn test_assessment_garbage_never_panics() {
        let assessment = parse_assessment("：：：\u{0000}\n\t:::");
        assert_eq!(assessment.score, 5);
        assert!(!assessment.strengths.is_empty());
        assert!(!assessment.improvements.is_empty());
        assert!(!assessment.detailed_feedback.is_empty());
    }

    #[test]
    fn test_assessment_huge_digit_run_clamps() {
        assert_eq!(parse_assessment("Score: 99999999999999999999999").score, 10);
    }

    #[test]
    fn test_pitch_analysis_splits_commas() {
        let analysis = parse_pitch_analysis(
            "Topics: rust, distributed systems\nExperience: 5 years backend\nSkills: tokio, sql\nInterests: open source",
        );
        assert_eq!(analysis.key_topics, vec!["rust", "distributed systems"]);
        assert_eq!(analysis.experience, vec!["5 years backend"]);
        assert_eq!(analysis.skills, vec!["tokio", "sql"]);
        assert_eq!(analysis.interests, vec!["open source"]);
    }

    #[test]
    fn test_pitch_analysis_last_line_wins() {
        let analysis = parse_pitch_analysis("Skills: python\nSkills: rust, go");
        assert_eq!(analysis.skills, vec!["rust", "go"]);
    }

    #[test]
    fn test_pitch_analysis_absent_sections_stay_empty() {
        let analysis = parse_pitch_analysis("Skills: writing");
        assert_eq!(analysis.skills, vec!["writing"]);
        assert!(analysis.key_topics.is_empty());
        assert!(analysis.experience.is_empty());
        assert!(analysis.interests.is_empty());
    }

    #[test]
    fn test_pitch_analysis_empty_input() {
        assert_eq!(parse_pitch_analysis(""), PitchAnalysis::default());
    }
}
