use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::generation::{FitScore, GenerateRequest};
use crate::models::style::{Length, Tone};

/// A completed application: one successful generation, immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub job_description: String,
    pub cv: String,
    pub cover_letter: String,
    pub fit_score: FitScore,
    pub tone: Tone,
    pub length: Length,
    pub date: DateTime<Utc>,
}

impl Application {
    pub fn new(request: &GenerateRequest, cover_letter: String, fit_score: FitScore) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_description: request.job_description.clone(),
            cv: request.resume.clone(),
            cover_letter,
            fit_score,
            tone: request.tone_or_default(),
            length: request.length_or_default(),
            date: Utc::now(),
        }
    }

    /// First `max_chars` characters of the job description, for list views.
    pub fn summary(&self, max_chars: usize) -> String {
        let mut chars = self.job_description.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest::new(
            "Senior Go engineer",
            "5 years backend",
            Tone::Friendly,
            Length::Short,
        )
    }

    #[test]
    fn test_new_copies_form_fields() {
        let app = Application::new(&request(), "Dear Hiring Manager,".into(), FitScore::new(72));
        assert_eq!(app.job_description, "Senior Go engineer");
        assert_eq!(app.cv, "5 years backend");
        assert_eq!(app.cover_letter, "Dear Hiring Manager,");
        assert_eq!(app.fit_score.value(), 72);
        assert_eq!(app.tone, Tone::Friendly);
        assert_eq!(app.length, Length::Short);
        assert!(Uuid::parse_str(&app.id).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Application::new(&request(), "a".into(), FitScore::default());
        let b = Application::new(&request(), "b".into(), FitScore::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_persisted_field_names_are_camel_case() {
        let app = Application::new(&request(), "Hi".into(), FitScore::new(10));
        let value = serde_json::to_value(&app).unwrap();
        for key in ["id", "jobDescription", "cv", "coverLetter", "fitScore", "tone", "length", "date"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["fitScore"], 10);
        assert_eq!(value["tone"], "Friendly");
    }

    #[test]
    fn test_summary_truncates_long_descriptions() {
        let mut app = Application::new(&request(), "x".into(), FitScore::default());
        assert_eq!(app.summary(60), "Senior Go engineer");
        app.job_description = "a".repeat(80);
        assert_eq!(app.summary(60), format!("{}...", "a".repeat(60)));
    }
}
