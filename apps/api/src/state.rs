use std::sync::Arc;

use crate::config::ServerConfig;
use crate::generation::fit_scoring::FitScorer;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion capability backing the cover letter stream.
    pub llm: Arc<dyn CompletionProvider>,
    /// Pluggable fit scorer. Default: LlmFitScorer over the same provider.
    pub fit_scorer: Arc<dyn FitScorer>,
    pub config: ServerConfig,
}
