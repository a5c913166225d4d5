// Cover letter generation: fit scoring, then a streamed completion.
// All LLM calls go through llm_client; no direct provider calls here.

pub mod fit_scoring;
pub mod generator;
pub mod handlers;
pub mod prompts;
