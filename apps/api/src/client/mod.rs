// Client side of the generation pipeline: transport, chunk decoding, the
// per-generation state machine and the local application history.

pub mod decoder;
pub mod history;
pub mod session;
pub mod transport;

use crate::client::history::HistoryStore;
use crate::client::session::{GenerationSession, SessionError};
use crate::client::transport::GenerationTransport;
use crate::models::application::Application;

/// One client instance: a transport plus the history it appends to.
///
/// Generating takes `&mut self`, so at most one session is in flight per
/// instance; a second submission cannot interleave with the first.
pub struct JobAssistant<T> {
    transport: T,
    history: HistoryStore,
}

impl<T: GenerationTransport> JobAssistant<T> {
    pub fn new(transport: T, history: HistoryStore) -> Self {
        Self { transport, history }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Runs `session` to completion against this instance's transport and history.
    pub async fn generate(
        &mut self,
        session: &mut GenerationSession,
    ) -> Result<Option<Application>, SessionError> {
        session.run(&self.transport, &mut self.history).await
    }
}
