//! Educational-content screening.
//!
//! The LLM gives the verdict when it can. Missing configuration and rate
//! limits let the video through; any other failure falls back to a keyword
//! heuristic over the full text.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::prompts::educational_check_prompt;
use crate::common::utils::parse_llm_json;
use crate::kernel::{is_rate_limit_error, BaseAI};

/// Shorter content (after trimming) cannot be judged.
pub const MIN_CONTENT_CHARS: usize = 50;

const EDUCATIONAL_KEYWORDS: [&str; 25] = [
    "tutorial",
    "learn",
    "course",
    "lesson",
    "explain",
    "how to",
    "guide",
    "education",
    "academic",
    "study",
    "teaching",
    "instruction",
    "lecture",
    "documentary",
    "science",
    "history",
    "mathematics",
    "programming",
    "coding",
    "skill",
    "knowledge",
    "concept",
    "theory",
    "practice",
    "training",
];

pub const INSUFFICIENT_CONTENT_REASON: &str =
    "Insufficient content to determine if video is educational.";
pub const AI_MISSING_REASON: &str =
    "AI educational check unavailable (API key missing); allowing video.";
pub const AI_RATE_LIMITED_REASON: &str =
    "AI educational check temporarily unavailable due to rate limits; allowing video.";
pub const HEURISTIC_REASON: &str = "Heuristic check based on keywords (AI analysis unavailable).";
/// Reason used when the model gives a verdict without one.
pub const UNKNOWN_REASON: &str = "Unable to determine";

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMethod {
    /// Too little text to ask about
    InsufficientContent,
    Ai,
    /// No AI configured
    AiUnavailable,
    AiRateLimited,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub is_educational: bool,
    pub reason: String,
    pub method: ClassificationMethod,
}

impl Classification {
    fn new(is_educational: bool, reason: impl Into<String>, method: ClassificationMethod) -> Self {
        Self {
            is_educational,
            reason: reason.into(),
            method,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    is_educational: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Decide whether `content` is educational.
pub async fn classify(ai: Option<&dyn BaseAI>, content: &str) -> Classification {
    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        return Classification::new(
            false,
            INSUFFICIENT_CONTENT_REASON,
            ClassificationMethod::InsufficientContent,
        );
    }

    let Some(ai) = ai else {
        info!("No AI configured, skipping educational check");
        return Classification::new(true, AI_MISSING_REASON, ClassificationMethod::AiUnavailable);
    };

    let prompt = educational_check_prompt(content);
    let raw = match ai.complete_json(&prompt).await {
        Ok(raw) => raw,
        Err(e) if is_rate_limit_error(&e) => {
            warn!(error = %e, "Educational check rate limited, allowing video");
            return Classification::new(
                true,
                AI_RATE_LIMITED_REASON,
                ClassificationMethod::AiRateLimited,
            );
        }
        Err(e) => {
            warn!(error = %e, "Educational check failed, using keyword heuristic");
            return keyword_heuristic(content);
        }
    };

    match parse_llm_json::<Verdict>(&raw) {
        Ok(verdict) => {
            debug!(is_educational = verdict.is_educational, "AI educational verdict");
            Classification::new(
                verdict.is_educational,
                verdict
                    .reason
                    .unwrap_or_else(|| UNKNOWN_REASON.to_string()),
                ClassificationMethod::Ai,
            )
        }
        Err(e) => {
            warn!(error = %e, "Unparseable educational verdict, using keyword heuristic");
            keyword_heuristic(content)
        }
    }
}

/// Educational when any keyword appears (case-insensitive).
pub fn keyword_heuristic(content: &str) -> Classification {
    let lower = content.to_lowercase();
    let is_educational = EDUCATIONAL_KEYWORDS.iter().any(|kw| lower.contains(kw));
    Classification::new(is_educational, HEURISTIC_REASON, ClassificationMethod::Heuristic)
}
