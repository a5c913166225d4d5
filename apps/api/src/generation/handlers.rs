//! Axum route handlers for the Generation API.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::generate_cover_letter;
use crate::models::generation::{GenerateRequest, FIT_SCORE_HEADER};
use crate::state::AppState;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// POST /api/generate
///
/// Scores fit, then streams the cover letter. The score travels in the
/// `x-fit-score` header so it is available before the first body byte; the
/// body is the provider stream forwarded verbatim.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    if !request.has_required_inputs() {
        return Err(AppError::Validation(
            "jobDescription and resume cannot be empty".to_string(),
        ));
    }

    let output =
        generate_cover_letter(state.llm.as_ref(), state.fit_scorer.as_ref(), &request).await?;
    info!("Streaming cover letter (fit score {})", output.fit_score);

    Response::builder()
        .status(StatusCode::OK)
        .header(FIT_SCORE_HEADER, HeaderValue::from(u16::from(output.fit_score.value())))
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .body(Body::from_stream(output.stream))
        .map_err(|e| AppError::Internal(e.into()))
}
