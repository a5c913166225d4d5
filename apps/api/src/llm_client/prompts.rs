// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// User turn shared by the scoring and generation calls.
pub fn candidate_message(job_description: &str, resume: &str) -> String {
    format!("Job Description:\n{job_description}\n\nResume:\n{resume}")
}
