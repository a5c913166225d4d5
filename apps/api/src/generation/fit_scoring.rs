//! Fit Scoring: pluggable, trait-based scorer for a CV against a job description.
//!
//! Default: `LlmFitScorer`, one deterministic completion whose answer is
//! reduced to a number. The score is advisory: it must never block cover
//! letter generation, so scorers are infallible and degrade to 0.
//!
//! `AppState` holds an `Arc<dyn FitScorer>`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::generation::prompts::{FIT_SCORE_MAX_TOKENS, FIT_SCORE_SYSTEM};
use crate::llm_client::prompts::candidate_message;
use crate::llm_client::{CompletionProvider, CompletionRequest};
use crate::models::generation::FitScore;

/// The fit scorer trait. Implement this to swap backends without touching
/// the endpoint or handler code.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(&self, job_description: &str, resume: &str) -> FitScore;
}

/// Scores fit with a single non-streamed completion at temperature 0.
pub struct LlmFitScorer {
    llm: Arc<dyn CompletionProvider>,
}

impl LlmFitScorer {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FitScorer for LlmFitScorer {
    async fn score(&self, job_description: &str, resume: &str) -> FitScore {
        let request =
            CompletionRequest::new(FIT_SCORE_SYSTEM, candidate_message(job_description, resume))
                .temperature(0.0)
                .max_tokens(FIT_SCORE_MAX_TOKENS);

        match self.llm.complete(&request).await {
            Ok(text) => {
                let score = parse_fit_score(&text);
                debug!("Fit score response {:?} -> {}", text, score);
                score
            }
            Err(e) => {
                warn!("Fit scoring failed, defaulting to 0: {e}");
                FitScore::default()
            }
        }
    }
}

/// Reduces free model text to a score.
///
/// Takes the first contiguous run of ASCII digits anywhere in the text
/// ("0" when there is none) and clamps it into 0..=100. A run too long to
/// fit an integer clamps to 100.
pub fn parse_fit_score(text: &str) -> FitScore {
    let digits = first_digit_run(text).unwrap_or("0");
    match digits.parse::<u64>() {
        Ok(n) => FitScore::new(n.min(FitScore::MAX as u64) as i64),
        Err(_) => FitScore::new(FitScore::MAX as i64),
    }
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{LlmError, TextStream};
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<&'static str, u16>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn replying(reply: Result<&'static str, u16>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(LlmError::Api {
                    status,
                    message: "boom".to_string(),
                }),
            }
        }

        async fn stream(&self, _request: &CompletionRequest) -> Result<TextStream, LlmError> {
            unreachable!("scoring never streams")
        }
    }

    #[test]
    fn test_parse_takes_first_digit_run() {
        assert_eq!(parse_fit_score("Score: 72 out of 100").value(), 72);
        assert_eq!(parse_fit_score("85").value(), 85);
        assert_eq!(parse_fit_score("about 64%, maybe 70").value(), 64);
    }

    #[test]
    fn test_parse_non_numeric_defaults_to_zero() {
        assert_eq!(parse_fit_score("N/A").value(), 0);
        assert_eq!(parse_fit_score("").value(), 0);
        assert_eq!(parse_fit_score("  \n").value(), 0);
    }

    #[test]
    fn test_parse_clamps_out_of_range() {
        assert_eq!(parse_fit_score("150").value(), 100);
        assert_eq!(parse_fit_score("99999999999999999999999999").value(), 100);
        // The sign is not part of the digit run.
        assert_eq!(parse_fit_score("-5").value(), 5);
    }

    #[test]
    fn test_parse_is_idempotent() {
        for text in ["Score: 72 out of 100", "N/A", "150", "007 agents", "x9y8"] {
            assert_eq!(parse_fit_score(text), parse_fit_score(text));
        }
    }

    #[tokio::test]
    async fn test_llm_scorer_uses_deterministic_short_request() {
        let provider = ScriptedProvider::replying(Ok("Score: 72 out of 100"));
        let scorer = LlmFitScorer::new(provider.clone());

        let score = scorer.score("Senior Go engineer", "5 years backend").await;
        assert_eq!(score.value(), 72);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, Some(0.0));
        assert_eq!(seen[0].max_tokens, Some(FIT_SCORE_MAX_TOKENS));
        assert_eq!(seen[0].system, FIT_SCORE_SYSTEM);
        assert!(seen[0].user.contains("Senior Go engineer"));
    }

    #[tokio::test]
    async fn test_llm_scorer_absorbs_provider_failure() {
        let scorer = LlmFitScorer::new(ScriptedProvider::replying(Err(503)));
        assert_eq!(scorer.score("jd", "cv").await, FitScore::default());
    }
}
