use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::style::{Length, Tone};

/// Response header carrying the fit score as a decimal string.
pub const FIT_SCORE_HEADER: &str = "x-fit-score";

pub const MISSING_INPUTS_MESSAGE: &str = "Please provide both job description and CV";

/// Wire body of `POST /api/generate`. The CV is called `resume` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub length: Option<Length>,
}

impl GenerateRequest {
    pub fn new(
        job_description: impl Into<String>,
        resume: impl Into<String>,
        tone: Tone,
        length: Length,
    ) -> Self {
        Self {
            job_description: job_description.into(),
            resume: resume.into(),
            tone: Some(tone),
            length: Some(length),
        }
    }

    /// Both inputs must be non-empty after trimming before anything is dispatched.
    pub fn has_required_inputs(&self) -> bool {
        !self.job_description.trim().is_empty() && !self.resume.trim().is_empty()
    }

    pub fn tone_or_default(&self) -> Tone {
        self.tone.clone().unwrap_or_default()
    }

    pub fn length_or_default(&self) -> Length {
        self.length.clone().unwrap_or_default()
    }
}

/// Advisory fit between a CV and a job description, always within 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct FitScore(u8);

impl FitScore {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Self {
        FitScore(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Reads the `x-fit-score` header value. Missing or non-integer → 0.
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(FitScore::new)
            .unwrap_or_default()
    }
}

impl From<i64> for FitScore {
    fn from(value: i64) -> Self {
        FitScore::new(value)
    }
}

impl From<FitScore> for u8 {
    fn from(score: FitScore) -> Self {
        score.0
    }
}

impl fmt::Display for FitScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
