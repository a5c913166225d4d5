//! Cover letter generation: orchestrates the two-stage pipeline.
//!
//! Flow: fit_score (awaited to completion) → open streamed completion → hand
//! the score and the open stream back to the caller.
//!
//! Scoring is not pipelined with streaming: the score must be
//! known before the response head is written.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::fit_scoring::FitScorer;
use crate::generation::prompts::COVER_LETTER_SYSTEM_TEMPLATE;
use crate::llm_client::prompts::candidate_message;
use crate::llm_client::{CompletionProvider, CompletionRequest, TextStream};
use crate::models::generation::{FitScore, GenerateRequest};
use crate::models::style::{Length, Tone};

/// A generation whose score is resolved and whose text is still streaming.
pub struct GenerationOutput {
    pub fit_score: FitScore,
    pub stream: TextStream,
}

/// Runs scoring, then opens the cover letter stream.
///
/// Scoring failures never surface here (they degrade to 0). Any failure to
/// open the stream aborts the whole request.
pub async fn generate_cover_letter(
    llm: &dyn CompletionProvider,
    fit_scorer: &dyn FitScorer,
    request: &GenerateRequest,
) -> Result<GenerationOutput, AppError> {
    let fit_score = fit_scorer
        .score(&request.job_description, &request.resume)
        .await;
    info!("Fit score: {fit_score}/100");

    let stream = open_cover_letter_stream(llm, request).await?;

    Ok(GenerationOutput { fit_score, stream })
}

/// Opens the streamed completion for the cover letter body. No retry.
pub async fn open_cover_letter_stream(
    llm: &dyn CompletionProvider,
    request: &GenerateRequest,
) -> Result<TextStream, AppError> {
    let tone = request.tone_or_default();
    let length = request.length_or_default();

    if !tone.is_recognized() {
        warn!("Unvalidated tone passed through to the instruction: {:?}", tone.as_str());
    }
    if !length.is_recognized() {
        warn!("Unvalidated length passed through to the instruction: {:?}", length.as_str());
    }

    let completion = CompletionRequest::new(
        build_cover_letter_system(&tone, &length),
        candidate_message(&request.job_description, &request.resume),
    );

    llm.stream(&completion)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))
}

/// Fills the cover letter system prompt with lower-cased style text.
pub fn build_cover_letter_system(tone: &Tone, length: &Length) -> String {
    COVER_LETTER_SYSTEM_TEMPLATE
        .replace("{tone}", &tone.instruction_text())
        .replace("{length}", &length.instruction_text())
}
