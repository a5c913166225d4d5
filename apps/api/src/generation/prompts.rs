// All LLM prompt constants for the Generation module.
// The user turn is shared: see llm_client::prompts::candidate_message.

/// System prompt for fit scoring: the model must answer with a bare number.
pub const FIT_SCORE_SYSTEM: &str = "You are a helpful assistant that evaluates how well \
    a candidate's resume matches a job description. \
    Respond ONLY with a number from 0 to 100 representing the fit score, \
    where 100 is a perfect match.";

/// Scoring output is a number; keep the completion tiny.
pub const FIT_SCORE_MAX_TOKENS: u32 = 10;

/// Cover letter system prompt. Replace `{tone}` and `{length}` before sending.
pub const COVER_LETTER_SYSTEM_TEMPLATE: &str = "You are a professional cover letter writer. \
    Generate a tailored cover letter based on the job description and CV provided. \
    The cover letter should have a {tone} tone and be {length} in length. \
    Focus on matching the candidate's experience with the job requirements \
    and maintain the specified tone and length.";
